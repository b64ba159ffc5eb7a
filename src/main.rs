// ==========================================
// 校友名册导入系统 - 命令行入口
// ==========================================
// 用法: alumni-roster <数据库路径> <CSV文件> [发起人]
// 输出: 导入报表 JSON（status/计数/拒绝明细）
// ==========================================

use alumni_roster::{logging, ImportApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", alumni_roster::APP_NAME);
    tracing::info!("系统版本: {}", alumni_roster::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("用法: {} <数据库路径> <CSV文件> [发起人]", args[0]);
        std::process::exit(2);
    }

    let db_path = &args[1];
    let csv_path = &args[2];
    let imported_by = args.get(3).map(|s| s.as_str()).unwrap_or("cli");

    tracing::info!("使用数据库: {}", db_path);

    let api = ImportApi::new(db_path)?;
    let report = api.import_alumni_csv(csv_path, imported_by).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
