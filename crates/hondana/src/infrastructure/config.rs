use serde::{Deserialize, Serialize};
use std::path::Path;
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct MyAnimeListConfig {
    pub client_id: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default = "default_library_path")]
    pub library_path: String,
    /// Upper bound in seconds for any single catalog request.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout: u64,
    pub myanimelist: Option<MyAnimeListConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: hondana_home().join("config.yml"),
            library_path: default_library_path(),
            fetch_timeout: default_fetch_timeout(),
            myanimelist: None,
        }
    }
}

fn hondana_home() -> PathBuf {
    match std::env::var("HONDANA_HOME") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs::home_dir().expect("should have home").join(".hondana"),
    }
}

fn default_library_path() -> String {
    let path = hondana_home();
    if !path.exists() {
        let _ = std::fs::create_dir_all(&path);
    }
    path.join("library.json").display().to_string()
}

fn default_fetch_timeout() -> u64 {
    15
}

impl Config {
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Config, anyhow::Error> {
        let config_path = match path {
            Some(p) => PathBuf::new().join(p),
            None => hondana_home().join("config.yml"),
        };

        match std::fs::File::open(config_path.clone()) {
            Ok(file) => {
                info!("Open config from {:?}", config_path);
                let mut cfg: Self = serde_yml::from_reader(file)?;
                cfg.path = config_path;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Config {
                    path: config_path,
                    ..Default::default()
                };
                cfg.save()?;
                info!("Write default config at {:?}", cfg.path);
                Ok(cfg)
            }
        }
    }

    pub fn save(&self) -> Result<(), anyhow::Error> {
        std::fs::write(&self.path, serde_yml::to_string(&self)?)?;

        Ok(())
    }
}
