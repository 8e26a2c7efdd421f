// ==========================================
// 物流 NT 看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、环境变量覆写
// 存储: JSON 文件 (key-value), 环境变量 LOGISTICA_<KEY> 优先
// ==========================================

use crate::domain::types::{DashboardWindowPolicy, DateFilterMode, Depot, DepotScope};
use crate::engine::progress::DEFAULT_HISTORY_CAPACITY;
use crate::sap::DEFAULT_SETTLE_DELAY;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "LOGISTICA_";

// ==========================================
// ConfigError - 配置错误
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    FileRead { path: String, message: String },

    #[error("配置文件格式错误: {0}")]
    InvalidJson(String),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: HashMap<String, String>,
}

impl ConfigManager {
    /// 空配置（全部使用默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从键值对创建
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 从 JSON 文件加载
    ///
    /// 文件内容为 JSON 对象; 字符串值原样保存, 其他值保存为 JSON 文本
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// 从 JSON 文本加载
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let parsed: Value =
            serde_json::from_str(content).map_err(|e| ConfigError::InvalidJson(e.to_string()))?;
        let object = match parsed {
            Value::Object(map) => map,
            other => {
                return Err(ConfigError::InvalidJson(format!(
                    "顶层必须是对象, 实际: {}",
                    other
                )))
            }
        };

        let values = object
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();
        Ok(Self { values })
    }

    /// 应用 LOGISTICA_<KEY> 环境变量覆写
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(std::env::vars())
    }

    /// 应用覆写（变量名格式 LOGISTICA_<KEY 大写>）
    pub fn with_overrides_from<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if let Some(key) = name.strip_prefix(ENV_PREFIX) {
                let key = key.to_lowercase();
                if config_keys::ALL.contains(&key.as_str()) {
                    debug!(key = %key, "环境变量覆写配置");
                    self.values.insert(key, value);
                }
            }
        }
        self
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        let value = self.get_config_or_default(key, if default { "true" } else { "false" });
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "sim" => true,
            "false" | "0" | "no" | "nao" | "não" => false,
            _ => {
                warn!(config_key = key, raw_value = %value, "布尔配置格式错误，使用默认值");
                default
            }
        }
    }

    /// 获取所有配置的快照（JSON格式, 按键排序）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let sorted: BTreeMap<&String, &String> = self.values.iter().collect();
        serde_json::to_string(&sorted).map_err(|e| ConfigError::InvalidJson(e.to_string()))
    }

    // ===== 文件路径 =====

    /// SAP 导出文件路径
    pub fn get_sap_export_path(&self) -> PathBuf {
        PathBuf::from(self.get_config_or_default(
            config_keys::SAP_EXPORT_PATH,
            defaults::SAP_EXPORT_PATH,
        ))
    }

    /// 备份目录（默认: 用户数据目录/logistica-dashboard/backup）
    pub fn get_backup_dir(&self) -> PathBuf {
        match self.get_config_value(config_keys::BACKUP_DIR).map(str::trim) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_backup_dir(),
        }
    }

    // ===== 业务配置 =====

    /// Normal 作业员名单（逗号分隔）
    pub fn get_normal_users(&self) -> Vec<String> {
        let value = self.get_config_or_default(config_keys::NORMAL_USERS, "");
        let users: Vec<String> = value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if users.is_empty() {
            defaults::NORMAL_USERS.iter().map(|s| s.to_string()).collect()
        } else {
            users
        }
    }

    /// 仓库列表（JSON 对象: 区域名 → 仓库代码）
    pub fn get_depots(&self) -> ConfigResult<Vec<Depot>> {
        let raw = match self.get_config_value(config_keys::DEPOTS) {
            Some(v) if !v.trim().is_empty() => v,
            _ => return Ok(default_depots()),
        };

        let parsed: serde_json::Map<String, Value> =
            serde_json::from_str(raw).map_err(|e| ConfigError::InvalidValue {
                key: config_keys::DEPOTS.to_string(),
                value: raw.to_string(),
                message: e.to_string(),
            })?;

        let mut depots = Vec::with_capacity(parsed.len());
        for (sector, code) in parsed {
            match code {
                Value::String(code) => depots.push(Depot::new(sector, code)),
                other => {
                    return Err(ConfigError::InvalidValue {
                        key: config_keys::DEPOTS.to_string(),
                        value: other.to_string(),
                        message: format!("区域 {} 的仓库代码必须是字符串", sector),
                    })
                }
            }
        }

        if depots.is_empty() {
            warn!("仓库配置为空，使用默认仓库");
            return Ok(default_depots());
        }
        Ok(depots)
    }

    pub fn get_date_filter_mode(&self) -> DateFilterMode {
        DateFilterMode::from_flag(self.get_bool(config_keys::DATE_FILTER_ENABLED, true))
    }

    pub fn get_dashboard_window_policy(&self) -> DashboardWindowPolicy {
        let value = self.get_config_or_default(
            config_keys::DASHBOARD_WINDOW_POLICY,
            "PLANNED_TODAY_OR_YESTERDAY",
        );
        DashboardWindowPolicy::parse(&value)
    }

    pub fn get_depot_scope(&self) -> DepotScope {
        let value = self.get_config_or_default(config_keys::DEPOT_SCOPE, "REQUESTED");
        DepotScope::parse(&value)
    }

    /// 进度历史保留的时间点数量（默认 20）
    pub fn get_history_capacity(&self) -> usize {
        let value = self.get_config_or_default(config_keys::HISTORY_CAPACITY, "20");
        match value.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => DEFAULT_HISTORY_CAPACITY,
        }
    }

    pub fn get_strip_ghost_rows(&self) -> bool {
        self.get_bool(config_keys::STRIP_GHOST_ROWS, true)
    }

    // ===== SAP 刷新 =====

    /// SAP 提取命令（未配置时为 None）
    pub fn get_sap_refresh_command(&self) -> Option<String> {
        self.get_config_value(config_keys::SAP_REFRESH_COMMAND)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    }

    /// 提取成功后的等待时间（默认 3 秒）
    pub fn get_sap_settle_delay(&self) -> Duration {
        self.get_config_value(config_keys::SAP_SETTLE_DELAY_SECS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SETTLE_DELAY)
    }

    // ===== 界面 =====

    pub fn get_locale(&self) -> String {
        self.get_config_or_default(config_keys::LOCALE, defaults::LOCALE)
    }

    /// 汇总为强类型设置
    pub fn settings(&self) -> ConfigResult<DashboardSettings> {
        Ok(DashboardSettings {
            sap_export_path: self.get_sap_export_path(),
            backup_dir: self.get_backup_dir(),
            normal_users: self.get_normal_users(),
            depots: self.get_depots()?,
            date_filter_mode: self.get_date_filter_mode(),
            dashboard_window_policy: self.get_dashboard_window_policy(),
            depot_scope: self.get_depot_scope(),
            history_capacity: self.get_history_capacity(),
            sap_refresh_command: self.get_sap_refresh_command(),
            sap_settle_delay: self.get_sap_settle_delay(),
            strip_ghost_rows: self.get_strip_ghost_rows(),
            locale: self.get_locale(),
        })
    }
}

// ==========================================
// DashboardSettings - 强类型设置
// ==========================================
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub sap_export_path: PathBuf,
    pub backup_dir: PathBuf,
    pub normal_users: Vec<String>,
    pub depots: Vec<Depot>,
    pub date_filter_mode: DateFilterMode,
    pub dashboard_window_policy: DashboardWindowPolicy,
    pub depot_scope: DepotScope,
    pub history_capacity: usize,
    pub sap_refresh_command: Option<String>,
    pub sap_settle_delay: Duration,
    pub strip_ghost_rows: bool,
    pub locale: String,
}

impl DashboardSettings {
    pub fn depot_codes(&self) -> Vec<String> {
        self.depots.iter().map(|d| d.code.clone()).collect()
    }
}

fn default_depots() -> Vec<Depot> {
    defaults::DEPOTS
        .iter()
        .map(|(sector, code)| Depot::new(*sector, *code))
        .collect()
}

fn default_backup_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("logistica-dashboard").join("backup"))
        .unwrap_or_else(|| PathBuf::from("./backup"))
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const SAP_EXPORT_PATH: &str = r"\\srv-ameixa\Area de Troca\mod.csv";
    pub const NORMAL_USERS: [&str; 5] = [
        "FERN.PINTO",
        "ANDR.DACOSTA",
        "GABY.DACOSTA",
        "WILL.CARNEIR",
        "CLAU.OLIVEIR",
    ];
    pub const DEPOTS: [(&str, &str); 2] = [("Mercearia", "DP01"), ("Perecíveis", "DP40")];
    pub const LOCALE: &str = "pt-BR";
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 文件
    pub const SAP_EXPORT_PATH: &str = "sap_export_path";
    pub const BACKUP_DIR: &str = "backup_dir";

    // 业务
    pub const NORMAL_USERS: &str = "normal_users";
    pub const DEPOTS: &str = "depots";
    pub const DATE_FILTER_ENABLED: &str = "date_filter_enabled";
    pub const DASHBOARD_WINDOW_POLICY: &str = "dashboard_window_policy";
    pub const DEPOT_SCOPE: &str = "depot_scope";
    pub const HISTORY_CAPACITY: &str = "history_capacity";
    pub const STRIP_GHOST_ROWS: &str = "strip_ghost_rows";

    // SAP 刷新
    pub const SAP_REFRESH_COMMAND: &str = "sap_refresh_command";
    pub const SAP_SETTLE_DELAY_SECS: &str = "sap_settle_delay_secs";

    // 界面
    pub const LOCALE: &str = "locale";

    pub const ALL: [&str; 12] = [
        SAP_EXPORT_PATH,
        BACKUP_DIR,
        NORMAL_USERS,
        DEPOTS,
        DATE_FILTER_ENABLED,
        DASHBOARD_WINDOW_POLICY,
        DEPOT_SCOPE,
        HISTORY_CAPACITY,
        STRIP_GHOST_ROWS,
        SAP_REFRESH_COMMAND,
        SAP_SETTLE_DELAY_SECS,
        LOCALE,
    ];
}
