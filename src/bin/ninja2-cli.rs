use std::io::Read;

use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;

use ninja2_gateway::cipher::{Ninja2Cipher, DEFAULT_KEY};
use ninja2_gateway::format::transcoder::unwrap_ninja2;

#[derive(Parser)]
#[command(name = "ninja2-cli")]
#[command(about = "Ninja2 cipher tool and test client", long_about = None)]
struct Cli {
    /// Cipher key shared with the gateway.
    #[arg(short, long, default_value = DEFAULT_KEY)]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encipher text (reads stdin when TEXT is omitted)
    Encrypt { text: Option<String> },
    /// Decipher text (reads stdin when TEXT is omitted)
    Decrypt { text: Option<String> },
    /// Send an enciphered XML request to a running gateway
    Call {
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
        /// Endpoint path, e.g. /cf-questload.asp
        path: String,
        /// XML body (reads stdin when omitted)
        body: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cipher = Ninja2Cipher::new(cli.key)?;

    match cli.command {
        Commands::Encrypt { text } => {
            let text = text_or_stdin(text)?;
            println!("{}", cipher.encrypt(text.as_bytes()));
        }
        Commands::Decrypt { text } => {
            let text = text_or_stdin(text)?;
            let plain = cipher.decrypt(text.trim())?;
            println!("{}", String::from_utf8_lossy(&plain));
        }
        Commands::Call { url, path, body } => {
            let body = text_or_stdin(body)?;
            let request = format!("<ninja2>{}</ninja2>", cipher.encrypt(body.as_bytes()));

            let res = reqwest::Client::new()
                .post(format!("{}{}", url.trim_end_matches('/'), path))
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(request)
                .send()
                .await?;
            print_response(&cipher, res).await?;
        }
    }

    Ok(())
}

fn text_or_stdin(text: Option<String>) -> std::io::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf.trim_end_matches('\n').to_string())
        }
    }
}

async fn print_response(
    cipher: &Ninja2Cipher,
    res: reqwest::Response,
) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }

    match unwrap_ninja2(&text) {
        Some(inner) => {
            let plain = cipher.decrypt(inner)?;
            println!("{}", String::from_utf8_lossy(&plain));
        }
        None => println!("{}", text),
    }
    Ok(())
}
