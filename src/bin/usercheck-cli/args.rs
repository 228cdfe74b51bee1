use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use usercheck_lib::{BlockOptions, ClientConfig, UserCheckRule, client};

#[derive(Parser)]
#[command(name = "usercheck-cli", version)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// lit les valeurs depuis stdin (une par ligne)
    #[arg(long)]
    pub stdin: bool,

    /// write report to file (JSON/NDJSON/CSV selon --format)
    #[arg(long)]
    pub out: Option<String>,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// clé d'API UserCheck
    #[arg(long, env = client::API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// URL de base de l'API
    #[arg(long, env = client::BASE_URL_ENV, default_value = client::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// nom du champ utilisé dans les messages d'erreur
    #[arg(long, default_value = "email")]
    pub attribute: String,

    /// paramètres de règle, ex. "block_disposable,block_no_mx"
    #[arg(long)]
    pub rule: Option<String>,

    /// rejette les adresses jetables
    #[arg(long)]
    pub block_disposable: bool,

    /// rejette les domaines sans MX
    #[arg(long)]
    pub block_no_mx: bool,

    /// rejette les domaines publics (webmail)
    #[arg(long)]
    pub block_public_domain: bool,

    #[arg(long)]
    pub block_blocklisted: bool,

    /// rejette les services de relais / alias
    #[arg(long)]
    pub block_relay_domain: bool,

    #[arg(long)]
    pub block_spam: bool,

    /// active toutes les options block_*
    #[arg(long)]
    pub all: bool,

    /// vérifie des domaines nus au lieu d'adresses
    #[arg(long)]
    pub domain_only: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// vérifie une adresse e-mail
    Email { value: String },
    /// vérifie un domaine
    Domain { value: String },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.api_key.clone().unwrap_or_default()).with_base_url(&self.base_url)
    }

    /// Refuse les combinaisons d'options qui seraient ignorées en silence.
    pub fn check_combinations(&self) -> Result<()> {
        if self.stdin && self.cmd.is_some() {
            bail!("--stdin cannot be combined with the email/domain subcommands");
        }
        if self.out.is_some() && self.format == "human" {
            bail!("--out requires --format json|ndjson|csv");
        }
        Ok(())
    }

    /// Flags et paramètres `--rule` combinés (OU logique).
    pub fn block_options(&self) -> BlockOptions {
        let base = match &self.rule {
            Some(rule) => rule
                .parse::<UserCheckRule>()
                .map(|r| *r.options())
                .unwrap_or_default(),
            None => BlockOptions::default(),
        };
        let base = if self.all {
            BlockOptions {
                domain_only: base.domain_only,
                ..BlockOptions::all()
            }
        } else {
            base
        };

        BlockOptions {
            block_disposable: base.block_disposable || self.block_disposable,
            block_no_mx: base.block_no_mx || self.block_no_mx,
            block_public_domain: base.block_public_domain || self.block_public_domain,
            block_blocklisted: base.block_blocklisted || self.block_blocklisted,
            block_relay_domain: base.block_relay_domain || self.block_relay_domain,
            block_spam: base.block_spam || self.block_spam,
            domain_only: base.domain_only || self.domain_only,
        }
    }
}
