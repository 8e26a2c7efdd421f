// ==========================================
// 物流 NT 看板 - SAP 刷新
// ==========================================
// 职责: 请求外部 SAP 客户端重新生成导出文件
// 红线: 只返回成功/失败, 不抛错; 成功后等待固定时间让文件落盘
// ==========================================

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, info, instrument, warn};

/// 传给 SAP 的日期格式
pub const SAP_DATE_FORMAT: &str = "%d.%m.%Y";

/// 默认等待时间
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(3);

// ==========================================
// SapRefresher Trait
// ==========================================
#[async_trait]
pub trait SapRefresher: Send + Sync {
    /// 提取指定日期的数据（计划日期上下限相同）
    ///
    /// # 返回
    /// - true: 提取成功, 导出文件已更新
    /// - false: 提取失败（原因已记录日志）
    async fn extract(&self, date: NaiveDate) -> bool;
}

// ==========================================
// CommandSapRefresher - 外部命令实现
// ==========================================
// 命令格式: "<程序> [参数...]", 日期作为最后一个参数追加
#[derive(Debug, Clone)]
pub struct CommandSapRefresher {
    command: String,
    settle_delay: Duration,
}

impl CommandSapRefresher {
    pub fn new(command: impl Into<String>, settle_delay: Duration) -> Self {
        Self {
            command: command.into(),
            settle_delay,
        }
    }
}

#[async_trait]
impl SapRefresher for CommandSapRefresher {
    #[instrument(skip(self), fields(command = %self.command))]
    async fn extract(&self, date: NaiveDate) -> bool {
        let mut parts = self.command.split_whitespace();
        let program = match parts.next() {
            Some(p) => p,
            None => {
                warn!("SAP 提取命令为空");
                return false;
            }
        };
        let date_arg = date.format(SAP_DATE_FORMAT).to_string();
        debug!(date = %date_arg, "开始 SAP 数据提取");

        let output = Command::new(program)
            .args(parts)
            .arg(&date_arg)
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(out) if out.status.success() => {
                // 等待导出文件写完
                tokio::time::sleep(self.settle_delay).await;
                info!(date = %date_arg, "SAP 数据提取成功");
                true
            }
            Ok(out) => {
                error!(
                    status = ?out.status.code(),
                    stderr = %String::from_utf8_lossy(&out.stderr),
                    "SAP 数据提取失败"
                );
                false
            }
            Err(e) => {
                error!(error = %e, "无法启动 SAP 提取命令");
                false
            }
        }
    }
}

// ==========================================
// DisabledSapRefresher - 未配置命令时使用
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DisabledSapRefresher;

#[async_trait]
impl SapRefresher for DisabledSapRefresher {
    async fn extract(&self, _date: NaiveDate) -> bool {
        warn!("未配置 SAP 提取命令, 跳过刷新");
        false
    }
}
