// ==========================================
// DashboardApi 集成测试
// ==========================================
// 测试范围:
// 1. 看板页: 指标 / 状态矩阵 / 进度登记 / 日期窗口
// 2. 计算页: 排名 / 完工预测 / 更新历史
// 3. 切单页 / 原始数据页 / 诊断
// 4. 重新加载与 SAP 刷新
// ==========================================

mod helpers;

use chrono::Duration;
use helpers::api_test_helper::*;
use helpers::test_data_builder::{export_bytes, export_bytes_without, NtRowBuilder};
use logistica_dashboard::api::{ApiError, ScreenOutcome};
use logistica_dashboard::domain::types::{
    DashboardWindowPolicy, DateFilterMode, NtStatus, OperatorType,
};
use logistica_dashboard::domain::Forecast;
use logistica_dashboard::engine::Clock;

/// DP01 四个 NT + 干扰行
///
/// - 100: 两行均完成（Normal）
/// - 101: 一行完成一行拣货中（Reforço）
/// - 102: 未开始（Normal）
/// - 104: 昨天计划, 已完成（Normal）
/// - 103: 五天前计划（不在任何窗口）
/// - 200: DP40
fn mixed_rows() -> Vec<NtRowBuilder> {
    vec![
        NtRowBuilder::new("100", "DP01")
            .quantity("10")
            .finalized_by("ANA")
            .planned(today())
            .produced(today()),
        NtRowBuilder::new("100", "DP01")
            .quantity("2,5")
            .finalized_by("ANA")
            .planned(today())
            .produced(today()),
        NtRowBuilder::new("101", "DP01")
            .quantity("3")
            .usuario("TEMP.01")
            .finalized_by("BIA")
            .planned(today())
            .produced(today()),
        NtRowBuilder::new("101", "DP01")
            .quantity("4")
            .usuario("TEMP.01")
            .picked_by("BIA")
            .planned(today()),
        NtRowBuilder::new("102", "DP01")
            .quantity("1.000")
            .planned(today()),
        NtRowBuilder::new("103", "DP01")
            .quantity("9")
            .planned(today() - Duration::days(5)),
        NtRowBuilder::new("104", "DP01")
            .quantity("1")
            .finalized_by("CARLA")
            .planned(yesterday())
            .produced(yesterday()),
        NtRowBuilder::new("200", "DP40")
            .quantity("5")
            .planned(today()),
    ]
}

/// DP40 共 100 行, 前 finalized 行已完成
fn progress_rows(finalized: usize) -> Vec<NtRowBuilder> {
    (0..100)
        .map(|i| {
            let row = NtRowBuilder::new(&format!("{}", 9000 + i / 10), "DP40").planned(today());
            if i < finalized {
                row.finalized_by("ANA").produced(today())
            } else {
                row
            }
        })
        .collect()
}

// ==========================================
// 看板页
// ==========================================

#[tokio::test]
async fn test_dashboard_metrics() {
    let env = ApiTestEnv::new();
    env.load_rows(&mixed_rows()).await;

    let outcome = env.api().dashboard("DP01").unwrap();
    let view = outcome.data().expect("看板应有数据");

    // 场景1: 行数 / 完成数 / 百分比（今天 + 昨天计划）
    assert_eq!(view.total_linhas, 6);
    assert_eq!(view.finalizadas, 4);
    assert_eq!(view.percent_finalized, 67);

    // 场景2: 数量汇总, Normal + Reforço = 总数
    assert_eq!(view.total_um, 1020.5);
    assert_eq!(view.normal_linhas, 4);
    assert_eq!(view.normal_um, 1013.5);
    assert_eq!(view.reforco_linhas, 2);
    assert_eq!(view.reforco_um, 7.0);
    assert_eq!(view.normal_um + view.reforco_um, view.total_um);

    // 场景3: NT 状态矩阵
    let matrix = &view.status_counts;
    assert_eq!(matrix.get(OperatorType::Normal, NtStatus::Finalizadas), 2);
    assert_eq!(matrix.get(OperatorType::Normal, NtStatus::Pendentes), 1);
    assert_eq!(matrix.get(OperatorType::Normal, NtStatus::EmSeparacao), 0);
    assert_eq!(matrix.get(OperatorType::Reforco, NtStatus::EmSeparacao), 1);
    let nts: Vec<&str> = view.status_nts.iter().map(|r| r.numero_nt.as_str()).collect();
    assert_eq!(nts, vec!["100", "101", "102", "104"]);

    // 场景4: 登记进度
    assert_eq!(view.progress.total, 6);
    assert_eq!(view.progress.finalizadas, 4);
    assert_eq!(view.progress.timestamp, base_time());
    assert_eq!(env.state.tracker.snapshots_for("DP01").len(), 1);
    assert!(env.state.tracker.snapshots_for("DP40").is_empty());
}

#[tokio::test]
async fn test_dashboard_unknown_depot_is_invalid_input() {
    let env = ApiTestEnv::new();
    env.load_rows(&mixed_rows()).await;

    let result = env.api().dashboard("DP99");
    match result {
        Err(ApiError::InvalidInput(msg)) => assert!(msg.contains("DP99")),
        other => panic!("应返回 InvalidInput, 实际: {:?}", other.map(|o| o.is_ready())),
    }
    assert!(env.state.tracker.timestamps().is_empty());
}

#[tokio::test]
async fn test_dashboard_without_data_shows_notice_only() {
    let env = ApiTestEnv::new();

    // 场景1: 文件不存在 → 空表
    let summary = env.api().reload().await.unwrap();
    assert_eq!(summary.rows_loaded, 0);
    assert_eq!(summary.notices.len(), 1);
    assert!(summary.notices[0].contains("Arquivo não encontrado"));

    let outcome = env.api().dashboard("DP01").unwrap();
    assert!(matches!(outcome, ScreenOutcome::NoData { .. }));
    assert!(outcome.notice().unwrap().contains("Atualizar Dados"));

    // 场景2: 仓库没有行
    env.load_rows(&[NtRowBuilder::new("1", "DP01").planned(today())])
        .await;
    let outcome = env.api().dashboard("DP40").unwrap();
    assert!(outcome.notice().unwrap().contains("DP40"));

    // 无数据时不登记进度
    assert!(env.state.tracker.snapshots_for("DP40").is_empty());
}

#[tokio::test]
async fn test_dashboard_missing_date_column_passes_unfiltered() {
    let env = ApiTestEnv::new();
    let rows = mixed_rows();
    env.write_raw_export(&export_bytes_without(&rows, &["DT_PLANEJADA"]));
    env.api().reload().await.unwrap();

    let outcome = env.api().dashboard("DP01").unwrap();
    match outcome {
        ScreenOutcome::Ready { data, notices } => {
            // DP01 全部 7 行
            assert_eq!(data.total_linhas, 7);
            assert_eq!(notices.len(), 1);
            assert!(notices[0].contains("DT_PLANEJADA"));
        }
        other => panic!("应返回 Ready, 实际: {:?}", other.notice()),
    }
}

#[tokio::test]
async fn test_dashboard_produced_today_policy() {
    let env = ApiTestEnv::with_settings(|s| {
        s.dashboard_window_policy = DashboardWindowPolicy::PlannedRecentProducedToday;
    });
    env.load_rows(&mixed_rows()).await;

    // 只有 DT_PRODUCAO = 今天 的行: NT 100 两行 + NT 101 一行
    let view = env.api().dashboard("DP01").unwrap().data().cloned().unwrap();
    assert_eq!(view.total_linhas, 3);
    assert_eq!(view.finalizadas, 3);
    assert_eq!(view.percent_finalized, 100);
}

// ==========================================
// 计算页
// ==========================================

#[tokio::test]
async fn test_calculations_forecast_from_two_refreshes() {
    let env = ApiTestEnv::new();

    // 09:00 完成 40/100
    env.load_rows(&progress_rows(40)).await;
    env.api().dashboard("DP40").unwrap();

    // 只有一次登记时历史不足
    let view = env.api().calculations("DP40").unwrap().data().cloned().unwrap();
    assert!(matches!(view.forecast.forecast, Forecast::Insufficient { .. }));
    assert!(view.forecast.notice.is_some());

    // 09:10 完成 50/100
    env.clock.advance(Duration::minutes(10));
    env.load_rows(&progress_rows(50)).await;
    env.api().dashboard("DP40").unwrap();

    let view = env.api().calculations("DP40").unwrap().data().cloned().unwrap();
    match &view.forecast.forecast {
        Forecast::Ok(estimate) => {
            assert_eq!(estimate.rate, 1.0);
            assert_eq!(estimate.remaining, 50);
            assert_eq!(estimate.eta_minutes, 50.0);
            assert_eq!(estimate.completion_time, base_time() + Duration::minutes(60));
            assert_eq!(estimate.completion_label, "10:00 - 15/03/2024");
        }
        other => panic!("应有完工预测, 实际: {:?}", other),
    }
    assert_eq!(view.forecast.remaining_hours, Some(0));
    assert_eq!(view.forecast.remaining_minutes, Some(50));
    assert!(view.forecast.notice.is_none());

    // 更新历史: 最新在前
    let percents: Vec<u32> = view.history.iter().map(|h| h.percent_complete).collect();
    assert_eq!(percents, vec![50, 40]);
    assert!(view.history_notice.is_none());

    // 排名: 只有 ANA
    assert_eq!(view.ranking.len(), 1);
    assert_eq!(view.ranking[0].nome_usuario, "ANA");
    assert_eq!(view.ranking[0].total_finalizadas, 50);
    assert_eq!(view.ranking[0].posicao_texto, "1º");
}

#[tokio::test]
async fn test_calculations_without_progress() {
    let env = ApiTestEnv::new();
    env.load_rows(&progress_rows(40)).await;
    env.api().dashboard("DP40").unwrap();
    env.clock.advance(Duration::minutes(5));
    env.api().dashboard("DP40").unwrap();

    let view = env.api().calculations("DP40").unwrap().data().cloned().unwrap();
    assert!(matches!(view.forecast.forecast, Forecast::NoProgress { .. }));
    assert_eq!(view.forecast.remaining_hours, None);
}

#[tokio::test]
async fn test_calculations_ranking_uses_today_only() {
    let env = ApiTestEnv::new();
    env.load_rows(&mixed_rows()).await;

    let view = env.api().calculations("DP01").unwrap().data().cloned().unwrap();

    // CARLA 的行是昨天计划的, 不在其他页窗口
    let names: Vec<(&str, usize)> = view
        .ranking
        .iter()
        .map(|r| (r.nome_usuario.as_str(), r.total_finalizadas))
        .collect();
    assert_eq!(names, vec![("ANA", 2), ("BIA", 1)]);
    assert_eq!(view.ranking[1].posicao, 2);

    // 没有访问过看板页, 没有历史
    assert!(view.history.is_empty());
    assert!(view.history_notice.unwrap().contains("DP01"));
}

#[tokio::test]
async fn test_calculations_ranking_empty_still_ready() {
    let env = ApiTestEnv::new();
    env.load_rows(&[NtRowBuilder::new("1", "DP01").planned(today())])
        .await;

    let outcome = env.api().calculations("DP01").unwrap();
    let view = outcome.data().expect("排名为空时页面仍可显示");
    assert!(view.ranking.is_empty());
    assert!(view.ranking_notice.is_some());
}

#[tokio::test]
async fn test_history_capacity_is_enforced() {
    let env = ApiTestEnv::with_settings(|s| s.history_capacity = 3);
    env.load_rows(&progress_rows(10)).await;

    for _ in 0..5 {
        env.api().dashboard("DP40").unwrap();
        env.clock.advance(Duration::minutes(1));
    }

    assert_eq!(env.state.tracker.timestamps().len(), 3);
    let view = env.api().calculations("DP40").unwrap().data().cloned().unwrap();
    assert_eq!(view.history.len(), 3);
    assert_eq!(view.history[0].timestamp, base_time() + Duration::minutes(4));
}

// ==========================================
// 切单页
// ==========================================

fn cut_rows() -> Vec<NtRowBuilder> {
    vec![
        // 切单: 完成但无生产日期
        NtRowBuilder::new("300", "DP01")
            .material("M1", "ARROZ 5KG")
            .quantity("2")
            .finalized_by("ANA")
            .planned(today()),
        // 已生产, 不是切单
        NtRowBuilder::new("300", "DP01")
            .material("M2", "FEIJÃO 1KG")
            .quantity("3")
            .finalized_by("ANA")
            .planned(today())
            .produced(today()),
        // 小写 x 也算切单, NT 没有作业员
        NtRowBuilder::new("301", "DP01")
            .material("M1", "ARROZ 5KG")
            .quantity("4")
            .flag("x")
            .planned(today()),
        NtRowBuilder::new("302", "DP40")
            .material("M1", "ARROZ 5KG")
            .quantity("1")
            .finalized_by("BIA")
            .produced_raw("00/00/0000")
            .planned(today()),
        NtRowBuilder::new("303", "DP40")
            .material("M3", "ÓLEO 900ML")
            .quantity("6")
            .planned(today()),
        // 昨天的切单不在窗口内
        NtRowBuilder::new("304", "DP40")
            .material("M3", "ÓLEO 900ML")
            .quantity("8")
            .finalized_by("BIA")
            .planned(yesterday()),
    ]
}

#[tokio::test]
async fn test_cuts_all_depots() {
    let env = ApiTestEnv::new();
    env.load_rows(&cut_rows()).await;

    let outcome = env.api().cuts(None).unwrap();
    let view = outcome.data().expect("应有切单");
    assert!(view.depot.is_none());

    let cuts = &view.cuts;
    assert_eq!(cuts.total_cortes, 3);
    assert_eq!(cuts.total_unidades_cortadas, 7.0);

    let operators: Vec<(&str, usize)> = cuts
        .cortes_por_operador
        .iter()
        .map(|o| (o.operador_corte.as_str(), o.total_cortes))
        .collect();
    assert_eq!(
        operators,
        vec![("ANA", 1), ("BIA", 1), ("Não identificado", 1)]
    );

    assert_eq!(cuts.cortes_por_material.len(), 1);
    assert_eq!(cuts.cortes_por_material[0].material, "M1");
    assert_eq!(cuts.cortes_por_material[0].total_cortes, 3);
    assert_eq!(cuts.cortes_por_material[0].total_unidades, 7.0);
}

#[tokio::test]
async fn test_cuts_by_depot_and_nothing_found() {
    let env = ApiTestEnv::new();
    env.load_rows(&cut_rows()).await;

    let view = env.api().cuts(Some("DP01")).unwrap().data().cloned().unwrap();
    assert_eq!(view.depot.unwrap().code, "DP01");
    assert_eq!(view.cuts.total_cortes, 2);
    assert_eq!(view.cuts.total_unidades_cortadas, 6.0);

    // 没有切单时只返回提示
    env.load_rows(&[NtRowBuilder::new("1", "DP01")
        .finalized_by("ANA")
        .planned(today())
        .produced(today())])
        .await;
    let outcome = env.api().cuts(Some("DP01")).unwrap();
    assert!(matches!(outcome, ScreenOutcome::NoData { .. }));
    assert!(outcome.notice().unwrap().contains("cortado"));

    assert!(matches!(env.api().cuts(Some("XX")), Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_cuts_missing_required_column() {
    let env = ApiTestEnv::new();
    env.write_raw_export(&export_bytes_without(&cut_rows(), &["DESC_MATERIAL"]));
    env.api().reload().await.unwrap();

    let outcome = env.api().cuts(None).unwrap();
    assert!(matches!(outcome, ScreenOutcome::NoData { .. }));
    assert!(outcome.notice().unwrap().contains("DESC_MATERIAL"));
}

// ==========================================
// 原始数据页
// ==========================================

#[tokio::test]
async fn test_raw_data_uses_other_window() {
    let env = ApiTestEnv::new();
    env.load_rows(&mixed_rows()).await;

    let view = env.api().raw_data("DP01").unwrap().data().cloned().unwrap();
    assert_eq!(view.total, 5);
    assert!(view.rows.iter().all(|r| r.deposito == "DP01"));
    assert!(view.rows.iter().all(|r| r.dt_planejada == "15.03.2024"));

    // 关闭日期过滤后全部放行
    let env = ApiTestEnv::with_settings(|s| s.date_filter_mode = DateFilterMode::Disabled);
    env.load_rows(&mixed_rows()).await;
    match env.api().raw_data("DP01").unwrap() {
        ScreenOutcome::Ready { data, notices } => {
            assert_eq!(data.total, 7);
            assert_eq!(notices.len(), 1);
        }
        other => panic!("应返回 Ready, 实际: {:?}", other.notice()),
    }
}

// ==========================================
// 诊断 / 刷新
// ==========================================

#[tokio::test]
async fn test_diagnostics() {
    let env = ApiTestEnv::new();
    let before = env.api().diagnostics().unwrap();
    assert!(!before.file_exists);
    assert!(before.file_size_kb.is_none());
    assert!(before.last_load.is_none());

    env.load_rows(&mixed_rows()).await;
    env.api().dashboard("DP01").unwrap();

    let diagnostics = env.api().diagnostics().unwrap();
    assert!(diagnostics.file_exists);
    assert!(diagnostics.file_size_kb.unwrap() > 0.0);
    assert_eq!(diagnostics.loaded_rows, 8);
    assert_eq!(diagnostics.rows_in_other_window, 6);
    assert_eq!(diagnostics.columns.len(), 10);
    assert_eq!(diagnostics.distinct_depots, vec!["DP01", "DP40"]);
    assert_eq!(diagnostics.history_timestamps, 1);
    assert_eq!(diagnostics.date_filter_mode, DateFilterMode::Enabled);

    let last_load = diagnostics.last_load.unwrap();
    assert_eq!(last_load.rows_read, 8);
    assert!(last_load.backup_path.unwrap().contains("dados_brutos_20240315_090000"));
}

#[tokio::test]
async fn test_refresh_from_sap_reloads_on_success() {
    let env = ApiTestEnv::new();
    env.load_rows(&mixed_rows()).await;

    env.refresher.set_payload(export_bytes(&progress_rows(10)));
    env.clock.advance(Duration::seconds(30));

    let summary = env.api().refresh_from_sap().await.unwrap();
    assert_eq!(summary.load.rows_loaded, 100);
    assert_eq!(summary.message, "Dados extraídos com sucesso!");
    assert_eq!(env.refresher.requested_dates(), vec![env.clock.today()]);

    // 新备份使用新的时间戳
    assert!(env
        .backup_dir
        .join("dados_brutos_20240315_090030.csv")
        .exists());
    assert_eq!(env.api().diagnostics().unwrap().loaded_rows, 100);
}

#[tokio::test]
async fn test_refresh_failure_keeps_current_table() {
    let env = ApiTestEnv::new();
    env.load_rows(&mixed_rows()).await;
    env.refresher.set_succeed(false);
    env.refresher.set_payload(export_bytes(&progress_rows(10)));

    let result = env.api().refresh_from_sap().await;
    match result {
        Err(ApiError::SapRefreshFailed(msg)) => assert!(msg.contains("SAP")),
        other => panic!("应返回 SapRefreshFailed, 实际: {:?}", other.is_ok()),
    }
    assert_eq!(env.refresher.calls(), 1);
    assert_eq!(env.api().diagnostics().unwrap().loaded_rows, 8);
}

#[tokio::test]
async fn test_depots_and_json_shape() {
    let env = ApiTestEnv::new();
    let depots = env.api().depots();
    let codes: Vec<&str> = depots.iter().map(|d| d.code.as_str()).collect();
    assert_eq!(codes, vec!["DP01", "DP40"]);

    env.load_rows(&mixed_rows()).await;
    let json = serde_json::to_value(env.api().dashboard("DP01").unwrap()).unwrap();
    assert_eq!(json["status"], "ready");
    assert_eq!(json["data"]["total_linhas"], 6);
    assert_eq!(json["data"]["depot"]["sector"], "Mercearia");

    let json = serde_json::to_value(env.api().dashboard("DP40").unwrap()).unwrap();
    assert_eq!(json["status"], "ready");
    let json = serde_json::to_value(env.api().raw_data("DP40").unwrap()).unwrap();
    assert_eq!(json["data"]["total"], 1);
}
