//! xmrkit CLI
//!
//! Monero key, address and mnemonic toolkit.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use xmrkit_core::{
    is_output_mine, mnemonic, stealth_payment_id, AccountKeys, Address, AddressKind, AddressRecord,
    KeyPair, Mnemonic, Network, PaymentId, PrivateKey, PublicKey, SubaddressIndex, LEGACY_SEED_LEN,
};

#[derive(Parser)]
#[command(name = "xmrkit")]
#[command(author = "xmrkit Team")]
#[command(version = "0.1.0")]
#[command(about = "Monero key, address and mnemonic toolkit", long_about = None)]
struct Cli {
    /// Network whose address tags to use
    #[arg(long, global = true, value_enum, default_value_t = NetworkArg::Mainnet)]
    network: NetworkArg,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or restore an account and print its keys and address
    Keys {
        #[command(flatten)]
        source: KeySource,

        /// Mnemonic language
        #[arg(short, long, default_value = "English")]
        language: String,
    },

    /// Decode an address and show its parts
    Decode {
        address: String,
    },

    /// Build an integrated address from a standard one
    Integrated {
        address: String,

        /// 16 hex characters; random when omitted
        #[arg(short, long)]
        payment_id: Option<String>,
    },

    /// Derive subaddresses
    Subaddress {
        #[command(flatten)]
        source: KeySource,

        /// Account index
        #[arg(long, default_value = "0")]
        major: u32,

        /// First address index within the account
        #[arg(long, default_value = "1")]
        minor: u32,

        /// Number of consecutive minor indices
        #[arg(short, long, default_value = "1")]
        count: u32,
    },

    /// Check whether an output key belongs to a wallet
    CheckOutput {
        /// Transaction public key (hex)
        #[arg(long)]
        tx_public: String,

        /// Wallet view secret (hex)
        #[arg(long)]
        view_secret: String,

        /// Wallet spend public key (hex)
        #[arg(long)]
        spend_public: String,

        /// Output position in the transaction
        #[arg(long)]
        index: u64,

        /// One-time output key (hex)
        #[arg(long)]
        output_key: String,
    },

    /// Generate a payment id, or encrypt/decrypt one with a key pair
    PaymentId {
        /// Payment id to transform (hex); random when omitted
        #[arg(long)]
        id: Option<String>,

        /// Recipient view public or transaction public key (hex)
        #[arg(long, requires = "secret")]
        public: Option<String>,

        /// Transaction secret or view secret (hex)
        #[arg(long, requires = "public")]
        secret: Option<String>,
    },

    /// List mnemonic languages
    Languages,
}

/// Where account keys come from; a fresh random account when none is given
#[derive(Args)]
#[group(multiple = false)]
struct KeySource {
    /// 32-byte seed (hex), reduced to the spend secret; 16 bytes for a legacy wallet
    #[arg(long)]
    seed: Option<String>,

    /// 25-word or 13-word mnemonic
    #[arg(long)]
    mnemonic: Option<String>,

    /// Spend secret (hex)
    #[arg(long)]
    spend_key: Option<String>,
}

impl KeySource {
    fn key_pair(&self) -> Result<KeyPair> {
        if let Some(seed) = &self.seed {
            let bytes = xmrkit_core::crypto::hex::decode(seed.trim()).context("seed is not hex")?;
            if let Ok(legacy) = <[u8; LEGACY_SEED_LEN]>::try_from(bytes.as_slice()) {
                return Ok(KeyPair::from_legacy_seed(&legacy));
            }
            let seed: [u8; 32] = bytes
                .as_slice()
                .try_into()
                .map_err(|_| anyhow::anyhow!("seed must be 32 or 16 bytes, got {}", bytes.len()))?;
            return Ok(KeyPair::from_seed(&seed));
        }
        if let Some(phrase) = &self.mnemonic {
            let mnemonic = Mnemonic::from_phrase(phrase)?;
            debug!(language = mnemonic.language(), "restored mnemonic");
            return Ok(KeyPair::from_mnemonic(&mnemonic)?);
        }
        if let Some(spend) = &self.spend_key {
            return Ok(KeyPair::from_spend_key(PrivateKey::from_hex(spend)?));
        }
        info!("No key source given, generating a new account");
        Ok(KeyPair::generate())
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum NetworkArg {
    Mainnet,
    Testnet,
    Stagenet,
}

impl From<NetworkArg> for Network {
    fn from(arg: NetworkArg) -> Self {
        match arg {
            NetworkArg::Mainnet => Network::Mainnet,
            NetworkArg::Testnet => Network::Testnet,
            NetworkArg::Stagenet => Network::Stagenet,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct KeysOutput {
    network: Network,
    address: String,
    spend_secret: PrivateKey,
    view_secret: PrivateKey,
    spend_public: PublicKey,
    view_public: PublicKey,
    mnemonic: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubaddressOutput {
    index: SubaddressIndex,
    address: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OwnershipOutput {
    index: u64,
    mine: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentIdOutput {
    input: PaymentId,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<PaymentId>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let network: Network = cli.network.into();
    let json = cli.json;

    match cli.command {
        Commands::Keys { source, language } => {
            cmd_keys(&source, &language, network, json)?;
        }
        Commands::Decode { address } => {
            cmd_decode(&address, json)?;
        }
        Commands::Integrated {
            address,
            payment_id,
        } => {
            cmd_integrated(&address, payment_id.as_deref(), network, json)?;
        }
        Commands::Subaddress {
            source,
            major,
            minor,
            count,
        } => {
            cmd_subaddress(&source, major, minor, count, network, json)?;
        }
        Commands::CheckOutput {
            tx_public,
            view_secret,
            spend_public,
            index,
            output_key,
        } => {
            let mine = is_output_mine(
                &tx_public.parse()?,
                &view_secret.parse()?,
                &spend_public.parse()?,
                index,
                &output_key.parse()?,
            );
            print(&OwnershipOutput { index, mine }, json, |o| {
                println!("Output {}: {}", o.index, if o.mine { "mine" } else { "not mine" });
            })?;
        }
        Commands::PaymentId { id, public, secret } => {
            cmd_payment_id(id.as_deref(), public.as_deref(), secret.as_deref(), json)?;
        }
        Commands::Languages => {
            let languages = mnemonic::languages();
            print(&languages, json, |langs| {
                for lang in langs {
                    println!("{lang}");
                }
            })?;
        }
    }

    Ok(())
}

/// Print `value` as pretty JSON or through `human`
fn print<T: Serialize>(value: &T, json: bool, human: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human(value);
    }
    Ok(())
}

fn cmd_keys(source: &KeySource, language: &str, network: Network, json: bool) -> Result<()> {
    let keys = source.key_pair()?;
    let account: AccountKeys = keys.account();
    let output = KeysOutput {
        network,
        address: account.address(&network.config()).encode(),
        spend_secret: account.spend_secret,
        view_secret: account.view_secret,
        spend_public: account.spend_public,
        view_public: account.view_public,
        mnemonic: keys.to_mnemonic(language)?.phrase(),
    };

    print(&output, json, |o| {
        println!("Network:      {}", o.network);
        println!("{:-<60}", "");
        println!("Address:      {}", o.address);
        println!("Spend secret: {}", o.spend_secret.to_hex());
        println!("View secret:  {}", o.view_secret.to_hex());
        println!("Spend public: {}", o.spend_public);
        println!("View public:  {}", o.view_public);
        println!("{:-<60}", "");
        println!("Mnemonic:     {}", o.mnemonic);
    })
}

fn cmd_decode(text: &str, json: bool) -> Result<()> {
    let address = Address::decode(text)?;
    let Some((network, kind)) = Network::classify(address.tag()) else {
        bail!("Address tag {} does not belong to a known network", address.tag());
    };
    let record: AddressRecord = address.record(kind);

    print(&record, json, |r| {
        println!("Network:    {network}");
        println!("Kind:       {}", r.kind);
        println!("Tag:        {}", r.network_byte);
        println!("Spend key:  {}", r.spend_key);
        println!("View key:   {}", r.view_key);
        if let Some(id) = &r.payment_id {
            println!("Payment id: {id}");
        }
    })
}

fn cmd_integrated(text: &str, payment_id: Option<&str>, network: Network, json: bool) -> Result<()> {
    let config = network.config();
    let address = Address::parse(text, &config)?;
    if address.payment_id().is_some() {
        bail!("Address is already integrated");
    }
    let id = match payment_id {
        Some(hex) => hex.parse::<PaymentId>()?,
        None => PaymentId::generate(),
    };

    let integrated = Address::integrated(&config, *address.spend_public(), *address.view_public(), id);
    let record = integrated.record(AddressKind::Integrated);
    print(&record, json, |r| {
        println!("Integrated: {}", r.address);
        println!("Payment id: {id}");
    })
}

fn cmd_subaddress(
    source: &KeySource,
    major: u32,
    minor: u32,
    count: u32,
    network: Network,
    json: bool,
) -> Result<()> {
    let account = source.key_pair()?.account();
    let config = network.config();
    let end = minor
        .checked_add(count)
        .ok_or_else(|| anyhow::anyhow!("minor index range overflows u32"))?;

    let subaddresses: Vec<SubaddressOutput> = (minor..end)
        .map(|minor| {
            let index = SubaddressIndex::new(major, minor);
            SubaddressOutput {
                index,
                address: account.subaddress(&config, index).encode(),
            }
        })
        .collect();

    print(&subaddresses, json, |subs| {
        for sub in subs {
            println!("{:<10} {}", sub.index.to_string(), sub.address);
        }
    })
}

fn cmd_payment_id(id: Option<&str>, public: Option<&str>, secret: Option<&str>, json: bool) -> Result<()> {
    let input = match id {
        Some(hex) => hex.parse::<PaymentId>()?,
        None => PaymentId::generate(),
    };

    let output = match (public, secret) {
        (Some(public), Some(secret)) => {
            let public: PublicKey = public.parse()?;
            let secret: PrivateKey = secret.parse()?;
            Some(stealth_payment_id(&input, &public, &secret))
        }
        _ => None,
    };

    print(&PaymentIdOutput { input, output }, json, |o| {
        println!("Payment id: {}", o.input);
        if let Some(out) = &o.output {
            println!("Stealth:    {out}");
        }
    })
}
