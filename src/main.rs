use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use botiscan::{
    fits_in_terminal, logging, render_to_terminal, ActionError, Config, DirectoryDelivery, Field,
    Session,
};

#[derive(Parser)]
#[command(name = "botiscan")]
#[command(
    author,
    version,
    about = "Turn contact details into a vCard QR code and a printable PDF",
    long_about = None
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ContactArgs {
    /// Person name (required)
    #[arg(long, default_value = "")]
    name: String,

    /// Company name (required)
    #[arg(long, default_value = "")]
    company: String,

    /// Designation or job title
    #[arg(long, default_value = "")]
    designation: String,

    /// Phone number (required)
    #[arg(long, default_value = "")]
    phone: String,

    /// Email address (required)
    #[arg(long, default_value = "")]
    email: String,

    /// Any link, e.g. a website or profile URL
    #[arg(long, default_value = "")]
    link: String,

    /// Postal address
    #[arg(long, default_value = "")]
    address: String,

    /// Logo image placed in the centre of the code
    #[arg(long)]
    logo: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the vCard payload
    Vcard {
        #[command(flatten)]
        contact: ContactArgs,
    },

    /// Preview the QR code as SVG and/or in the terminal
    Preview {
        #[command(flatten)]
        contact: ContactArgs,

        /// Write the SVG preview to this file
        #[arg(long)]
        svg: Option<PathBuf>,

        /// Draw the code in the terminal (default when --svg is not given)
        #[arg(short, long)]
        terminal: bool,
    },

    /// Export the printable PDF
    Export {
        #[command(flatten)]
        contact: ContactArgs,

        /// Output directory for the PDF
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Decode a QR code image and print its text
    #[cfg(feature = "decode")]
    Verify {
        /// PNG or JPEG image containing one QR code
        input: PathBuf,
    },
}

/// Fill a fresh session from the flags and submit it.
async fn generate(config: &Config, contact: &ContactArgs) -> Result<Session> {
    let mut session = Session::new(config);
    for (field, value) in [
        (Field::PersonName, &contact.name),
        (Field::CompanyName, &contact.company),
        (Field::Designation, &contact.designation),
        (Field::PhoneNo, &contact.phone),
        (Field::Email, &contact.email),
        (Field::AnyLink, &contact.link),
        (Field::Address, &contact.address),
    ] {
        session.set_field(field, value.as_str());
    }

    if let Some(path) = &contact.logo {
        session
            .upload_logo(path)
            .await
            .with_context(|| format!("Failed to load logo {}", path.display()))?;
    }

    if let Err(e) = session.submit() {
        anyhow::bail!("{}", e.user_message());
    }
    Ok(session)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    logging::init_logging(&config.logging);

    match cli.command {
        Commands::Vcard { contact } => {
            let session = generate(&config, &contact).await?;
            println!("{}", session.generated_payload()?);
        }

        Commands::Preview {
            contact,
            svg,
            terminal,
        } => {
            let session = generate(&config, &contact).await?;
            let preview = session.preview()?;

            if let Some(path) = &svg {
                std::fs::write(path, &preview.svg)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("SVG preview: {}", path.display());
            }

            if terminal || svg.is_none() {
                let payload = session.generated_payload()?;
                if !fits_in_terminal(&payload, &config.code)? {
                    eprintln!("Terminal is smaller than the code; the preview may wrap.");
                }
                print!("{}", render_to_terminal(&payload, &config.code)?);
                println!("{}", session.form().person_name);
            }
        }

        Commands::Export { contact, output } => {
            let mut session = generate(&config, &contact).await?;
            let mut delivery = DirectoryDelivery::new(&output);

            let artifact = match session.export(&mut delivery).await {
                Ok(artifact) => artifact,
                Err(ActionError::Export(e)) => {
                    tracing::error!(error = %e, "export failed");
                    anyhow::bail!("{}", e.user_message());
                }
                Err(e) => return Err(e.into()),
            };

            for degradation in &artifact.degraded {
                eprintln!("Warning: {degradation}");
            }
            println!(
                "Saved {} ({} bytes)",
                delivery.path_for(&artifact.filename).display(),
                artifact.bytes.len()
            );
        }

        #[cfg(feature = "decode")]
        Commands::Verify { input } => {
            let img = image::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            println!("{}", botiscan::decode_raster(&img)?);
        }
    }

    Ok(())
}
