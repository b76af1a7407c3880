//! Command-line surface: validation, report writing, and the real binary's exit codes.

mod common;

#[cfg(test)]
mod cli_tests {
    use super::common::{MockEndpoint, TEST_API_KEY, write_image};
    use design_lens::cli::{self, CliError, ValidationError, WORKING_MESSAGE};
    use design_lens::config::{API_KEY_ENV, API_URL_ENV};
    use std::process::Command;

    #[tokio::test]
    async fn test_writes_markdown_beside_image() {
        let endpoint = MockEndpoint::with_content("# Layout\n...").await;
        let dir = tempfile::tempdir().unwrap();
        let image = write_image(dir.path(), "photo.png");
        let mut printed = Vec::new();

        let output = cli::run(&endpoint.client(), &image, |line| printed.push(line.to_string()))
            .await
            .expect("cli run should succeed");

        assert_eq!(output, dir.path().join("photo.md"));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "# Layout\n...");
        assert_eq!(printed.len(), 2);
        assert_eq!(printed[0], WORKING_MESSAGE);
        assert!(printed[1].contains("photo.md"), "{}", printed[1]);
    }

    #[tokio::test]
    async fn test_rejects_text_file_with_image_extension() {
        let endpoint = MockEndpoint::with_content("unused").await;
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("notes.png");
        std::fs::write(&fake, "just some text, not pixels").unwrap();
        let mut printed = Vec::new();

        let err = cli::run(&endpoint.client(), &fake, |line| printed.push(line.to_string()))
            .await
            .expect_err("non-image must be rejected");

        assert!(matches!(
            err,
            CliError::Validation(ValidationError::Invalid { .. })
        ));
        assert!(err.to_string().starts_with("无效的图片文件"));
        assert!(printed.is_empty());
        assert!(!dir.path().join("notes.md").exists());
        assert_eq!(endpoint.request_count(), 0);
    }

    #[tokio::test]
    async fn test_rejects_missing_file() {
        let endpoint = MockEndpoint::with_content("unused").await;
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.png");

        let err = cli::run(&endpoint.client(), &missing, |_| {})
            .await
            .expect_err("missing file must be rejected");

        assert!(matches!(
            err,
            CliError::Validation(ValidationError::Missing(_))
        ));
        assert!(err.to_string().starts_with("文件不存在"));
        assert_eq!(endpoint.request_count(), 0);
    }

    #[tokio::test]
    async fn test_api_failure_writes_nothing() {
        let endpoint = MockEndpoint::start(503, "overloaded").await;
        let dir = tempfile::tempdir().unwrap();
        let image = write_image(dir.path(), "photo.png");

        let err = cli::run(&endpoint.client(), &image, |_| {})
            .await
            .expect_err("503 must fail");

        assert!(matches!(err, CliError::Analysis(_)));
        assert!(!dir.path().join("photo.md").exists());
    }

    #[test]
    fn test_binary_exits_1_for_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("fake.jpg");
        std::fs::write(&fake, "hello").unwrap();

        let output = Command::new(env!("CARGO_BIN_EXE_design-lens"))
            .arg(&fake)
            .current_dir(dir.path())
            .env(API_URL_ENV, "http://127.0.0.1:9/v1/chat/completions")
            .env(API_KEY_ENV, TEST_API_KEY)
            .output()
            .expect("binary should run");

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("错误: 无效的图片文件"), "{}", stderr);
        assert!(!dir.path().join("fake.md").exists());
    }

    #[test]
    fn test_binary_exits_1_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_image(dir.path(), "photo.png");

        let output = Command::new(env!("CARGO_BIN_EXE_design-lens"))
            .arg(&image)
            .current_dir(dir.path())
            .env_remove(API_URL_ENV)
            .env_remove(API_KEY_ENV)
            .output()
            .expect("binary should run");

        assert_eq!(output.status.code(), Some(1));
        assert!(!dir.path().join("photo.md").exists());
    }
}
