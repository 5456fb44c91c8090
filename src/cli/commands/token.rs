use clap::Args;
use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::cli::{utils, OutputFormat};

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "User id the token is issued for")]
    pub user: Uuid,

    #[arg(long, default_value = "console", help = "Display name carried in the token")]
    pub name: String,

    #[arg(long = "permission", short = 'p', help = "Capability to grant (repeatable, '*' grants all)")]
    pub permissions: Vec<String>,

    #[arg(long, help = "Hours until expiry (defaults to the configured expiry)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let claims = match args.hours {
        Some(hours) => Claims::with_expiry(args.user, args.name, args.permissions, hours),
        None => Claims::new(args.user, args.name, args.permissions),
    };
    let token = generate_jwt(&claims)?;

    match output_format {
        OutputFormat::Json => utils::output_success(
            &output_format,
            "Token issued",
            Some(json!({ "token": token, "expires_at": claims.exp, "permissions": claims.permissions })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
