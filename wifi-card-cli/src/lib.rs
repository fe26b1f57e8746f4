pub mod config;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;

use wifi_card::core::qr::DEFAULT_BOX_SIZE;
use wifi_card::{
    CardLayout, CardOptions, Credential, EncryptionType, FontConfig, QrCodeIo, QrMatrix,
    render_card_with_payload, verify_round_trip,
};

use crate::config::{Config, load_config};

/// Quiet zone for the terminal rendering of `--show`.
const SHOW_BORDER: u32 = 2;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Encryption {
    /// WPA/WPA2 personal
    Wpa,
    /// WEP (experimental)
    Wep,
    /// No encryption
    Open,
}

impl From<Encryption> for EncryptionType {
    fn from(value: Encryption) -> Self {
        match value {
            Encryption::Wpa => EncryptionType::Wpa,
            Encryption::Wep => EncryptionType::Wep,
            Encryption::Open => EncryptionType::Open,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "wifi-card")]
#[command(version, about = "Create a printable card with a QR code to join a Wi-Fi network")]
struct Args {
    /// SSID of the network
    #[arg(value_name = "SSID")]
    ssid: String,

    /// Save card in this file (format from the extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the payload and the QR code to the terminal
    #[arg(short, long)]
    show: bool,

    /// Indicate a hidden (stealth) SSID is used
    #[arg(long)]
    hidden: bool,

    /// Encryption type, WEP is experimental
    #[arg(short = 't', long = "type", value_enum, default_value_t = Encryption::Wpa)]
    encryption: Encryption,

    /// Password for access
    #[arg(short, long, default_value = "")]
    password: String,

    /// Transition Disable value as hex digits
    #[arg(long, default_value = "")]
    transition_disable: String,

    /// SAE password identifier
    #[arg(long = "id", default_value = "")]
    id_printable: String,

    /// Base64 SAE-PK public key
    #[arg(long, default_value = "")]
    public_key: String,

    /// Also write the QR code as text to this file
    #[arg(long)]
    ascii: Option<PathBuf>,

    /// Write only the QR code to --output, without the card
    #[arg(long)]
    qr_only: bool,

    /// Pixels per module for --qr-only output
    #[arg(long)]
    box_size: Option<u32>,

    /// Do not frame the card
    #[arg(long)]
    no_border: bool,

    /// Decode the written file and check it matches the payload
    #[arg(long, requires = "output")]
    verify: bool,

    /// Regular font file for card text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Bold font file for card text
    #[arg(long)]
    font_bold: Option<PathBuf>,

    /// Config file (default: <config dir>/wifi-card/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn credential(&self) -> Credential {
        Credential::new(self.ssid.as_str())
            .with_hidden(self.hidden)
            .with_encryption_type(self.encryption)
            .with_password(self.password.as_str())
            .with_transition_disable(self.transition_disable.as_str())
            .with_id_printable(self.id_printable.as_str())
            .with_public_key(self.public_key.as_str())
    }

    /// Command-line flags win over the config file.
    fn card_options(&self, config: &Config) -> CardOptions {
        let mut layout = CardLayout::default();
        if let Some(ratio) = config.width_used_by_qr_image {
            layout.width_used_by_qr_image = ratio;
        }

        CardOptions {
            layout,
            fonts: FontConfig {
                regular: self.font.clone().or_else(|| config.font.clone()),
                bold: self.font_bold.clone().or_else(|| config.font_bold.clone()),
            },
            draw_border: !self.no_border && config.draw_border.unwrap_or(true),
        }
    }

    fn box_size(&self, config: &Config) -> u32 {
        self.box_size
            .or(config.box_size)
            .unwrap_or(DEFAULT_BOX_SIZE)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = load_config(args.config.as_deref())?;
    let credential = args.credential();
    let payload = credential.uri().context("failed to encode credentials")?;
    let box_size = args.box_size(&config);

    if args.qr_only && args.output.is_none() {
        bail!("--qr-only needs --output");
    }

    if let Some(output) = &args.output {
        if args.qr_only {
            QrCodeIo::default()
                .write_png(&payload, output, box_size, None)
                .with_context(|| format!("failed to write {}", output.display()))?;
        } else {
            let options = args.card_options(&config);
            let card = render_card_with_payload(&credential, &payload, &options)
                .context("failed to render card")?;
            card.save(output)
                .with_context(|| format!("failed to save {}", output.display()))?;
        }
        info!("Wrote {}", output.display());

        if args.verify {
            verify_round_trip(&payload, output)
                .with_context(|| format!("{} does not scan back", output.display()))?;
            println!("Verified {}", output.display());
        }
    }

    if let Some(ascii) = &args.ascii {
        QrCodeIo::write_txt(&payload, ascii, box_size, None)
            .with_context(|| format!("failed to write {}", ascii.display()))?;
        info!("Wrote {}", ascii.display());
    }

    if args.show {
        println!("{payload}");
        print!("{}", QrMatrix::generate(&payload, 1, Some(SHOW_BORDER))?.to_ascii());
    } else if args.output.is_none() && args.ascii.is_none() {
        println!("{payload}");
    }

    Ok(())
}
