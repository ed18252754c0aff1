use std::path::Path;

use eyre::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// `U256` as a plain YAML number or a decimal/`0x` string, written back as decimal.
pub mod decimal_u256 {
    use ethers::types::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    pub fn serialize<S>(value: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(U256::from(n)),
            Repr::Text(s) => {
                let s = s.trim();
                if let Some(hex) = s.strip_prefix("0x") {
                    U256::from_str_radix(hex, 16)
                        .map_err(serde::de::Error::custom)
                } else {
                    U256::from_dec_str(s).map_err(serde::de::Error::custom)
                }
            }
        }
    }
}

pub async fn read_deserialize<T>(path: impl AsRef<Path>) -> eyre::Result<T>
where
    T: DeserializeOwned,
{
    let path = path.as_ref();

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Reading from {}", path.display()))?;

    let value = serde_yaml::from_str(&content).with_context(|| {
        format!("Parsing {} content was {content}", path.display())
    })?;

    Ok(value)
}

pub async fn write_serialize<T>(
    path: impl AsRef<Path>,
    value: T,
) -> eyre::Result<()>
where
    T: Serialize,
{
    let path = path.as_ref();

    let content = serde_yaml::to_string(&value)
        .with_context(|| format!("Serializing {}", path.display()))?;

    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Writing to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        supply: u64,
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");

        let err = read_deserialize::<Sample>(&path).await.unwrap_err();

        assert!(format!("{err:?}").contains("nope.yml"));
    }

    #[tokio::test]
    async fn written_yaml_is_readable() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("sample.yml");

        let sample = Sample {
            name: "L1 ERC20".to_string(),
            supply: 10000,
        };
        write_serialize(&path, &sample).await?;

        let content = tokio::fs::read_to_string(&path).await?;
        assert!(content.contains("name: L1 ERC20"));

        let read: Sample = read_deserialize(&path).await?;
        assert_eq!(read, sample);

        Ok(())
    }
}
