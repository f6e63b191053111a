/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use crate::config::Config;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 优先使用 RUST_LOG；未设置时默认 info，`verbose` 为 true 时为 debug
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 开始生成提交文件 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("👥 队伍: {}", config.team_id);
    info!("🏷️ Run 前缀: {}", config.run_id_prefix);
    info!("🤖 模型: {} ({:?})", config.llm_model_name, config.llm_provider);
    info!(
        "📏 字数上限: {} (目标 {}, 最多缩写 {} 次)",
        config.word_limit, config.target_words, config.max_shorten_attempts
    );
    info!("{}", "=".repeat(60));
}

/// 记录输入加载信息
pub fn log_inputs_loaded(articles: usize, topics_path: &str) {
    info!("✓ 从 {} 读取到 {} 篇待处理文章", topics_path, articles);
}

/// 记录单篇文章开始
pub fn log_article_start(index: usize, total: usize, article_id: &str) {
    info!("\n{}", "─".repeat(60));
    info!("📄 [{}/{}] 文章 {}", index, total, article_id);
}

/// 记录缩写未能达标
pub fn log_over_budget(article_id: &str, word_count: usize, word_limit: usize) {
    warn!(
        "[文章 {}] ⚠️ 缩写次数用尽，仍有 {} 词 (上限 {})",
        article_id, word_count, word_limit
    );
}

/// 打印最终统计信息
pub fn print_final_stats(
    articles: usize,
    questions: usize,
    shortened: usize,
    over_budget: usize,
    shorten_calls: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 文章: {}", articles);
    info!("❓ 问题: {}", questions);
    info!("✂️ 缩写报告: {} (共调用 {} 次)", shortened, shorten_calls);
    if over_budget > 0 {
        warn!("⚠️ 仍超出字数上限: {}", over_budget);
    } else {
        info!("✅ 所有报告均在字数上限内");
    }
    info!("{}", "=".repeat(60));
}
