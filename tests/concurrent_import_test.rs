// ==========================================
// 并发导入测试
// ==========================================
// 测试目标: 同库并发导入下的重复键竞态与报表不变式
// ==========================================


use alumni_roster::logging;
use alumni_roster::repository::{
    AlumniRepository, AlumniRepositoryImpl, ImportLogRepositoryImpl,
};
use alumni_roster::RosterImporter;
use std::sync::Arc;

fn create_test_importer(
    db_path: &str,
) -> RosterImporter<AlumniRepositoryImpl, ImportLogRepositoryImpl> {
    let alumni = Arc::new(AlumniRepositoryImpl::new(db_path).expect("创建校友仓储失败"));
    let ledger = Arc::new(ImportLogRepositoryImpl::new(db_path).expect("创建台账仓储失败"));
    RosterImporter::new(alumni, ledger)
}

#[tokio::test]
async fn test_concurrent_imports_same_key_accepted_once() {
    logging::init_test();
    let (_temp, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");

    // 两个独立导入器（各自持有独立连接）竞争同一批键
    let importer_a = create_test_importer(&db_path);
    let importer_b = create_test_importer(&db_path);

    let csv = test_helpers::valid_roster_csv();
    let (report_a, report_b) = tokio::join!(
        importer_a.import(csv.as_bytes(), "a.csv", "alice"),
        importer_b.import(csv.as_bytes(), "b.csv", "bob"),
    );
    let report_a = report_a.expect("导入 A 失败");
    let report_b = report_b.expect("导入 B 失败");

    // 每个报表自身计数闭合
    assert_eq!(
        report_a.successful_records + report_a.failed_records,
        report_a.total_records
    );
    assert_eq!(
        report_b.successful_records + report_b.failed_records,
        report_b.total_records
    );

    // 每个键恰好被一侧接受（唯一约束 + 重分类兜底竞态）
    assert_eq!(
        report_a.successful_records + report_b.successful_records,
        3
    );

    let alumni = AlumniRepositoryImpl::new(&db_path).expect("创建校友仓储失败");
    assert_eq!(alumni.count_alumni().await.unwrap(), 3);

    // 输掉竞态的一侧给出重复拒绝原因
    let loser_rejected: Vec<_> = report_a
        .rejected
        .iter()
        .chain(report_b.rejected.iter())
        .collect();
    assert_eq!(loser_rejected.len(), 3);
    for rejected in loser_rejected {
        assert!(rejected
            .reasons
            .iter()
            .any(|r| r.contains("already exists")));
    }
}

#[tokio::test]
async fn test_many_concurrent_imports_single_key() {
    let (_temp, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");

    let csv = "name,graduation_year,degree_program\nSarah Chen,2018,Film Production\n";
    let importers: Vec<_> = (0..4).map(|_| create_test_importer(&db_path)).collect();
    let users: Vec<String> = (0..4).map(|i| format!("user{}", i)).collect();

    let reports = futures::future::join_all(
        importers
            .iter()
            .zip(users.iter())
            .map(|(imp, user)| imp.import(csv.as_bytes(), "same.csv", user)),
    )
    .await;

    let mut accepted_total = 0;
    for report in reports {
        let report = report.expect("导入失败");
        assert_eq!(report.total_records, 1);
        accepted_total += report.successful_records;
    }
    assert_eq!(accepted_total, 1);

    let alumni = AlumniRepositoryImpl::new(&db_path).expect("创建校友仓储失败");
    assert_eq!(alumni.count_alumni().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_imports_disjoint_keys_all_accepted() {
    let (_temp, db_path) = test_helpers::create_test_db().expect("创建测试数据库失败");

    let importer_a = create_test_importer(&db_path);
    let importer_b = create_test_importer(&db_path);

    let csv_a = "name,graduation_year,degree_program\n\
                 Sarah Chen,2018,Film Production\n\
                 Marcus Webb,2019,Animation\n";
    let csv_b = "name,graduation_year,degree_program\n\
                 Ella Park,2020,Documentary\n\
                 Noah Reed,2021,Television\n";

    let (report_a, report_b) = tokio::join!(
        importer_a.import(csv_a.as_bytes(), "a.csv", "alice"),
        importer_b.import(csv_b.as_bytes(), "b.csv", "bob"),
    );
    let report_a = report_a.expect("导入 A 失败");
    let report_b = report_b.expect("导入 B 失败");

    assert_eq!(report_a.successful_records, 2);
    assert_eq!(report_b.successful_records, 2);

    let alumni = AlumniRepositoryImpl::new(&db_path).expect("创建校友仓储失败");
    assert_eq!(alumni.count_alumni().await.unwrap(), 4);
}
