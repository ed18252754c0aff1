use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;

pub mod private_key;

pub use private_key::PrivateKey;

#[derive(Debug, Clone, Parser)]
#[clap(rename_all = "kebab-case", about = "Deploys a token bridge across a source and a destination network")]
pub struct Args {
    /// Path to the deployment configuration file
    #[clap(short, long, env)]
    pub config: PathBuf,

    /// The name of the deployment
    ///
    /// Used as the directory the deployment manifest is written to.
    /// Should be something meaningful like 'local-2023-04-18'
    #[clap(short, long, env)]
    pub deployment_name: String,

    /// Private key to use on both networks
    #[clap(short, long, env)]
    pub private_key: PrivateKey,

    /// Overrides the source network RPC Url from the config
    #[clap(long, env)]
    pub source_rpc_url: Option<Url>,

    /// Overrides the destination network RPC Url from the config
    #[clap(long, env)]
    pub destination_rpc_url: Option<Url>,

    /// Validate the config and print the deployment plan without sending anything
    #[clap(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn parses_required_and_override_flags() {
        let args = Args::try_parse_from([
            "bridge-deployer",
            "--config",
            "deploy.yml",
            "--deployment-name",
            "local",
            "--private-key",
            KEY,
            "--destination-rpc-url",
            "http://l2.example:8545",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(args.config, PathBuf::from("deploy.yml"));
        assert_eq!(args.deployment_name, "local");
        assert!(args.source_rpc_url.is_none());
        assert_eq!(
            args.destination_rpc_url.map(|url| url.to_string()),
            Some("http://l2.example:8545/".to_string())
        );
        assert!(args.dry_run);
    }

    #[test]
    fn rejects_malformed_private_key() {
        let result = Args::try_parse_from([
            "bridge-deployer",
            "--config",
            "deploy.yml",
            "--deployment-name",
            "local",
            "--private-key",
            "0xnothex",
        ]);

        assert!(result.is_err());
    }
}
