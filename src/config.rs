use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Where sauce images end up.
#[derive(Debug, Clone, Deserialize)]
pub enum StorageConfig {
    /// Files on disk, served back under `/images`.
    Local {
        dir: PathBuf,
        public_base_url: String,
    },
    /// S3 or MinIO bucket.
    S3 {
        endpoint: String,
        bucket: String,
        access_key: String,
        secret_key: String,
        region: String,
        public_url: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| get(key).with_context(|| format!("{key} must be set"));
        let parsed = |key: &str, default: u64| -> anyhow::Result<u64> {
            match get(key) {
                Some(v) => v
                    .parse::<u64>()
                    .with_context(|| format!("{key} must be a positive integer")),
                None => Ok(default),
            }
        };

        let ttl_minutes = parsed("JWT_TTL_MINUTES", 60 * 24)?;
        let ttl_minutes = i64::try_from(ttl_minutes)
            .ok()
            .filter(|m| m.checked_mul(60).is_some())
            .context("JWT_TTL_MINUTES out of range")?;

        let jwt = JwtConfig {
            secret: required("JWT_SECRET")?,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "sauceboard".into()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "sauceboard-users".into()),
            ttl_minutes,
        };

        let port = parsed("APP_PORT", 8080)?;
        let port = u16::try_from(port).context("APP_PORT out of range")?;

        let storage = match get("STORAGE_BACKEND").as_deref().unwrap_or("local") {
            "local" => StorageConfig::Local {
                dir: get("IMAGES_DIR").unwrap_or_else(|| "./images".into()).into(),
                public_base_url: get("PUBLIC_BASE_URL")
                    .unwrap_or_else(|| format!("http://localhost:{port}")),
            },
            "s3" => {
                let endpoint = required("MINIO_ENDPOINT")?;
                StorageConfig::S3 {
                    public_url: get("S3_PUBLIC_URL").unwrap_or_else(|| endpoint.clone()),
                    endpoint,
                    bucket: required("MINIO_BUCKET")?,
                    access_key: required("MINIO_ACCESS_KEY")?,
                    secret_key: required("MINIO_SECRET_KEY")?,
                    region: get("MINIO_REGION").unwrap_or_else(|| "us-east-1".into()),
                }
            }
            other => anyhow::bail!("unknown STORAGE_BACKEND {other:?}, expected local or s3"),
        };

        let db_max_connections = u32::try_from(parsed("DB_MAX_CONNECTIONS", 10)?)
            .context("DB_MAX_CONNECTIONS out of range")?;
        let max_upload_bytes = usize::try_from(parsed("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?)
            .context("MAX_UPLOAD_BYTES out of range")?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            max_upload_bytes,
            jwt,
            storage,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_local_storage_and_day_long_tokens() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/sauces"),
            ("JWT_SECRET", "s3cr3t"),
        ]))
        .expect("config");

        assert_eq!(cfg.jwt.ttl_minutes, 1440);
        assert_eq!(cfg.jwt.issuer, "sauceboard");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.db_max_connections, 10);
        match cfg.storage {
            StorageConfig::Local {
                dir,
                public_base_url,
            } => {
                assert_eq!(dir, PathBuf::from("./images"));
                assert_eq!(public_base_url, "http://localhost:8080");
            }
            StorageConfig::S3 { .. } => panic!("expected local storage"),
        }
    }

    #[test]
    fn oversized_numbers_are_rejected() {
        let base = [("DATABASE_URL", "postgres://x"), ("JWT_SECRET", "s")];
        for (key, value) in [
            ("JWT_TTL_MINUTES", "18446744073709551615"),
            ("JWT_TTL_MINUTES", "9223372036854775807"),
            ("DB_MAX_CONNECTIONS", "4294967296"),
            ("APP_PORT", "70000"),
        ] {
            let mut pairs = base.to_vec();
            pairs.push((key, value));
            let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(err.to_string().contains(key), "{key}={value}: {err}");
        }
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn s3_backend_requires_bucket_settings() {
        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("STORAGE_BACKEND", "s3"),
            ("MINIO_ENDPOINT", "http://minio:9000"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("MINIO_BUCKET"));
    }

    #[test]
    fn s3_public_url_falls_back_to_endpoint() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("STORAGE_BACKEND", "s3"),
            ("MINIO_ENDPOINT", "http://minio:9000"),
            ("MINIO_BUCKET", "sauces"),
            ("MINIO_ACCESS_KEY", "ak"),
            ("MINIO_SECRET_KEY", "sk"),
        ]))
        .expect("config");
        match cfg.storage {
            StorageConfig::S3 {
                public_url, region, ..
            } => {
                assert_eq!(public_url, "http://minio:9000");
                assert_eq!(region, "us-east-1");
            }
            StorageConfig::Local { .. } => panic!("expected s3 storage"),
        }
    }

    #[test]
    fn rejects_unknown_backend_and_bad_numbers() {
        assert!(AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("STORAGE_BACKEND", "ftp"),
        ]))
        .is_err());
        assert!(AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("APP_PORT", "eighty"),
        ]))
        .is_err());
    }
}
