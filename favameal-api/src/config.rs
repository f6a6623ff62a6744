use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Meal and restaurant favorites API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Apply pending database migrations and exit
    Migrate(DatabaseArgs),
}

#[derive(Args)]
pub struct DatabaseArgs {
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// HS256 secret shared with the service that issues access tokens
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: SocketAddr,

    /// Do not apply pending migrations on startup
    #[arg(long)]
    pub skip_migrations: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from([
            "favameal-api",
            "serve",
            "--database-url",
            "postgres://localhost/favameal",
            "--secret-key",
            "secret",
            "--listen-addr",
            "127.0.0.1:9000",
            "--skip-migrations",
        ])
        .unwrap();

        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.database.database_url, "postgres://localhost/favameal");
                assert_eq!(args.secret_key, "secret");
                assert_eq!(args.listen_addr, "127.0.0.1:9000".parse().unwrap());
                assert!(args.skip_migrations);
            }
            Commands::Migrate(_) => panic!("expected serve"),
        }
    }
}
