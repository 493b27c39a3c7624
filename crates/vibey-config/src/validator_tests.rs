    use super::*;
    use crate::schema::DelayRange;

    fn keyed_config() -> Config {
        let mut config = Config::default();
        config.provider.api_key = Some("sk-test".to_string());
        config.audit.api_key = Some("uc-test".to_string());
        config
    }

    #[test]
    fn test_validate_default_config() {
        let result = ConfigValidator::validate(&keyed_config()).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_zero_quota() {
        let mut config = keyed_config();
        config.quota.max_comments_per_day = 0;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "quota.max_comments_per_day"));
    }

    #[test]
    fn test_validate_inverted_range() {
        let mut config = keyed_config();
        config.pacing.typing = DelayRange::new(200, 100);

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "pacing.typing"));
    }

    #[test]
    fn test_validate_probability_out_of_range() {
        let mut config = keyed_config();
        config.engagement.like_probability = 1.5;
        config.pacing.thinking_probability = -0.1;

        let result = ConfigValidator::validate(&config).unwrap();
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors.iter().any(|e| e.path == "engagement.like_probability"));
        assert!(result.errors.iter().any(|e| e.path == "pacing.thinking_probability"));
    }

    #[test]
    fn test_validate_zero_failure_threshold() {
        let mut config = keyed_config();
        config.runloop.max_consecutive_failures = 0;

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_validate_invalid_endpoint() {
        let mut config = keyed_config();
        config.browser.endpoint = "localhost:9444".to_string();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.errors.iter().any(|e| e.path == "browser.endpoint"));
    }

    #[test]
    fn test_validate_no_feed_source() {
        let mut config = keyed_config();
        config.browser.search_keywords.clear();

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(!result.is_valid());

        config.browser.home_url = Some("https://twitter.com/home".to_string());
        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
    }

    #[test]
    fn test_validate_missing_keys_warns() {
        let config = Config::default();
        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "provider.api_key"));
        assert!(result.warnings.iter().any(|w| w.path == "audit.api_key"));
    }

    #[test]
    fn test_validate_short_inter_comment_warns() {
        let mut config = keyed_config();
        config.pacing.inter_comment = DelayRange::new(1000, 2000);

        let result = ConfigValidator::validate(&config).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "pacing.inter_comment"));
    }

    #[test]
    fn test_into_result_reports_first_error() {
        let mut config = keyed_config();
        config.quota.max_comments_per_day = 0;

        let err = ConfigValidator::validate(&config)
            .unwrap()
            .into_result()
            .unwrap_err();
        assert!(err.to_string().contains("quota.max_comments_per_day"));
    }
