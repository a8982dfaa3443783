/// Skip a test if AWS credentials or the test prefix are not configured.
#[macro_export]
macro_rules! skip_without_aws {
    () => {
        if std::env::var("AWS_ACCESS_KEY_ID").is_err() {
            eprintln!("SKIPPED: AWS_ACCESS_KEY_ID not set");
            return;
        }
        if std::env::var("SILO_TEST_PREFIX").is_err() {
            eprintln!("SKIPPED: SILO_TEST_PREFIX not set (set to a disposable name prefix)");
            return;
        }
    };
}
