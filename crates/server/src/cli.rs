use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(name = "workout plan server")]
pub struct Cli {
    #[clap(long, env, default_value = "workouts.sqlite")]
    pub sqlite_connection_string: String,
    #[clap(long, env, default_value = "8080")]
    pub port: u16,
    #[clap(long, env, default_value = "127.0.0.1")]
    pub bind_addr: String,
    #[arg(long, env, default_value = "http://localhost:8080")]
    pub cors_origin: String,
    /// Largest request body accepted by the JSON routes
    #[arg(long, env, default_value = "65536")]
    pub request_body_limit_bytes: usize,

    /// Adds the stock exercises to the catalog on startup. Exercises that
    /// already exist by name are left alone
    #[arg(long, env, default_value = "false")]
    pub seed_exercise_catalog: bool,

    /// Makes the named user an admin on startup
    #[arg(long, env)]
    pub promote_admin: Option<String>,

    /// Deletes the database before starting the main program for debug purposes
    #[arg(long, env, default_value = "false")]
    pub debug_delete_database: bool,
}

