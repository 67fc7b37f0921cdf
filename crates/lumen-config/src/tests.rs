#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.research.sources, vec!["pubmed", "crossref", "semanticscholar", "arxiv"]);
        assert_eq!(config.research.max_results, 10);
        assert!(config.research.web_fallback);
        assert_eq!(config.store.history_limit, 20);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            [research]
            sources = ["pubmed"]
            max_results = 5

            [analysis]
            stage_delay_ms = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.research.sources, vec!["pubmed"]);
        assert_eq!(config.research.max_results, 5);
        assert_eq!(config.research.request_timeout_secs, 30);
        assert_eq!(config.analysis.stage_delay_ms, 0);
        assert_eq!(config.store.path, "./lumen-data");
    }

    #[test]
    fn test_missing_named_file_is_error() {
        let err = Config::load_from("/nonexistent/lumen.toml").unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lumen.toml");
        std::fs::write(&path, "[store]\npath = \"/tmp/lumen\"\n").unwrap();
        let config = Config::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.store.path, "/tmp/lumen");
    }

    #[test]
    fn test_env_keys_do_not_override_file_keys() {
        let mut config = Config::from_toml(
            "[research.pubmed]\napi_key = \"from-file\"\n",
        )
        .unwrap();
        config.apply_env(|key| match key {
            "NCBI_API_KEY" => Some("from-env".to_string()),
            "SEMANTIC_SCHOLAR_API_KEY" => Some("s2-env".to_string()),
            _ => None,
        });
        assert_eq!(config.research.pubmed.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.research.semanticscholar.api_key.as_deref(), Some("s2-env"));
    }

    #[test]
    fn test_empty_env_key_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some(String::new()));
        assert!(config.research.pubmed.api_key.is_none());
    }
}
