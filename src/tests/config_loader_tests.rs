#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::config::loader::{ConfigError, load_config_from_file, save_config_to_file};
    use crate::config::{CONFIG, Config};
    use std::fs;
    use std::path::PathBuf;
    use std::sync::{Mutex, MutexGuard};
    use tempfile::tempdir;

    // The loader resolves its path through an environment variable, so the
    // tests that touch it must not run concurrently
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    // Helper function to point the loader at a temp config path
    fn create_test_config_path() -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("test_config.toml");

        unsafe {
            std::env::set_var("BLOCKFALL_CONFIG", config_path.to_str().unwrap());
        }

        (temp_dir, config_path)
    }

    #[test]
    fn test_load_nonexistent_config() {
        let _guard = lock_env();
        let (_temp_dir, config_path) = create_test_config_path();

        // Loading a non-existent config should create a default one
        let config = load_config_from_file().expect("Failed to load default config");

        assert!(config_path.exists(), "Config file should have been created");

        // Check default values are set
        assert_eq!(config.game.starting_level, 1);
        assert!(config.ui.show_next_piece);
        assert_eq!(config.history.max_recent, 10);
    }

    #[test]
    fn test_save_and_load_config() {
        let _guard = lock_env();
        let (_temp_dir, _config_path) = create_test_config_path();

        let mut config = Config::default();
        config.game.starting_level = 5;
        config.history.max_recent = 25;

        save_config_to_file(&config).expect("Failed to save config");

        let loaded_config = load_config_from_file().expect("Failed to load config");

        assert_eq!(loaded_config.game.starting_level, 5);
        assert_eq!(loaded_config.history.max_recent, 25);
    }

    #[test]
    fn test_malformed_config() {
        let _guard = lock_env();
        let (_temp_dir, config_path) = create_test_config_path();

        // Write invalid TOML
        fs::write(&config_path, "invalid toml content ! @ #")
            .expect("Failed to write invalid config");

        let result = load_config_from_file();

        match result {
            Err(ConfigError::Parse(_)) => {
                // Expected error
            }
            Ok(_) => panic!("Expected error when loading invalid config"),
            Err(e) => panic!("Unexpected error type: {e:?}"),
        }
    }

    #[test]
    fn test_partial_config() {
        let _guard = lock_env();
        let (_temp_dir, config_path) = create_test_config_path();

        // Write a partial config with only some fields
        let partial_config = r"
            [game]
            starting_level = 7
        ";

        fs::write(&config_path, partial_config).expect("Failed to write partial config");

        // Missing sections fill in with defaults
        let loaded_config = load_config_from_file().expect("Failed to load partial config");

        assert_eq!(loaded_config.game.starting_level, 7);
        assert!(loaded_config.ui.show_next_piece);
        assert_eq!(loaded_config.history.max_recent, 10);
    }

    #[test]
    fn test_force_reload_updates_the_global_config() {
        let _guard = lock_env();
        let (_temp_dir, config_path) = create_test_config_path();

        fs::write(&config_path, "[history]\nmax_recent = 42\n")
            .expect("Failed to write config file");

        assert!(Config::force_reload());

        {
            let config = CONFIG.read().expect("Config lock poisoned");
            assert_eq!(config.history.max_recent, 42);

            // Sections absent from the file come back as defaults
            assert_eq!(config.game.starting_level, 1);
            assert!(config.ui.show_next_piece);
        }

        // Restore the defaults for the other tests reading the global
        if let Ok(mut config) = CONFIG.write() {
            *config = Config::default();
        }
        unsafe {
            std::env::remove_var("BLOCKFALL_CONFIG");
        }
    }

    #[test]
    fn test_config_env_var_override() {
        let _guard = lock_env();
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("override_config.toml");

        unsafe {
            std::env::set_var("BLOCKFALL_CONFIG", config_path.to_str().unwrap());
        }

        let mut config = Config::default();
        config.game.starting_level = 9;

        save_config_to_file(&config).expect("Failed to save config");

        let loaded_config = load_config_from_file().expect("Failed to load config");
        assert_eq!(loaded_config.game.starting_level, 9);

        unsafe {
            std::env::remove_var("BLOCKFALL_CONFIG");
        }
    }
}
