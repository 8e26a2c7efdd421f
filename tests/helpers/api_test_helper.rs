// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 临时目录 + 固定时钟 + 假 SAP 刷新协作方
// ==========================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

use logistica_dashboard::api::DashboardApi;
use logistica_dashboard::app::AppState;
use logistica_dashboard::config::{ConfigManager, DashboardSettings};
use logistica_dashboard::engine::FixedClock;
use logistica_dashboard::sap::SapRefresher;

use super::test_data_builder::{export_bytes, NtRowBuilder};

/// 测试基准时间: 2024-03-15 09:00:00
pub fn base_time() -> NaiveDateTime {
    today().and_hms_opt(9, 0, 0).unwrap()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

pub fn yesterday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
}

// ==========================================
// 假 SAP 刷新协作方
// ==========================================

/// 成功时把预置内容写到导出文件
pub struct FakeSapRefresher {
    target: PathBuf,
    succeed: AtomicBool,
    calls: AtomicUsize,
    payload: Mutex<Option<Vec<u8>>>,
    requested_dates: Mutex<Vec<NaiveDate>>,
}

impl FakeSapRefresher {
    pub fn new(target: PathBuf) -> Self {
        Self {
            target,
            succeed: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
            payload: Mutex::new(None),
            requested_dates: Mutex::new(Vec::new()),
        }
    }

    pub fn set_succeed(&self, succeed: bool) {
        self.succeed.store(succeed, Ordering::SeqCst);
    }

    pub fn set_payload(&self, bytes: Vec<u8>) {
        *self.payload.lock().unwrap() = Some(bytes);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_dates(&self) -> Vec<NaiveDate> {
        self.requested_dates.lock().unwrap().clone()
    }
}

#[async_trait]
impl SapRefresher for FakeSapRefresher {
    async fn extract(&self, date: NaiveDate) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested_dates.lock().unwrap().push(date);
        if !self.succeed.load(Ordering::SeqCst) {
            return false;
        }
        if let Some(bytes) = self.payload.lock().unwrap().take() {
            std::fs::write(&self.target, bytes).unwrap();
        }
        true
    }
}

// ==========================================
// API测试环境
// ==========================================

pub struct ApiTestEnv {
    pub temp_dir: TempDir,
    pub source_path: PathBuf,
    pub backup_dir: PathBuf,
    pub clock: Arc<FixedClock>,
    pub refresher: Arc<FakeSapRefresher>,
    pub state: AppState,
}

impl ApiTestEnv {
    /// 默认配置（两个仓库, 日期过滤开启）
    pub fn new() -> Self {
        Self::with_settings(|_| {})
    }

    /// 在默认配置基础上调整
    pub fn with_settings<F>(adjust: F) -> Self
    where
        F: FnOnce(&mut DashboardSettings),
    {
        logistica_dashboard::i18n::set_locale("pt-BR");

        let temp_dir = TempDir::new().expect("无法创建临时目录");
        let source_path = temp_dir.path().join("mod.csv");
        let backup_dir = temp_dir.path().join("backup");

        let mut settings = ConfigManager::new().settings().expect("默认配置无效");
        settings.sap_export_path = source_path.clone();
        settings.backup_dir = backup_dir.clone();
        adjust(&mut settings);

        let clock = Arc::new(FixedClock::new(base_time()));
        let refresher = Arc::new(FakeSapRefresher::new(source_path.clone()));
        let state = AppState::with_components(settings, clock.clone(), refresher.clone());

        Self {
            temp_dir,
            source_path,
            backup_dir,
            clock,
            refresher,
            state,
        }
    }

    pub fn api(&self) -> &DashboardApi {
        &self.state.dashboard_api
    }

    /// 写导出文件
    pub fn write_export(&self, rows: &[NtRowBuilder]) {
        std::fs::write(&self.source_path, export_bytes(rows)).expect("无法写导出文件");
    }

    pub fn write_raw_export(&self, bytes: &[u8]) {
        std::fs::write(&self.source_path, bytes).expect("无法写导出文件");
    }

    /// 写导出文件并重新加载
    pub async fn load_rows(&self, rows: &[NtRowBuilder]) {
        self.write_export(rows);
        self.api().reload().await.expect("重新加载失败");
    }
}
