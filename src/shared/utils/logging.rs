use tracing_subscriber::EnvFilter;

/// 로그 초기화
///
/// `RUST_LOG`가 없으면 `default_filter` 사용 (예: "info", "exchange_store=debug")
/// 이미 초기화되어 있으면 조용히 무시 (테스트에서 여러 번 호출 가능)
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
