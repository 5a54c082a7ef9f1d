/// `RUST_LOG` wins over the configured level when set.
pub fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    if let Err(error) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("logging already initialised: {error}");
    }
}
