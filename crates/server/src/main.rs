use std::net::{IpAddr, SocketAddr};

use anyhow::anyhow;
use clap::Parser;
use server::{cli::Cli, db, routes, AppState};
use shared::{
    configure_tracing, load_dotenv,
    model::{seed_exercise_catalog, User},
};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    load_dotenv()?;
    configure_tracing();

    let args = Cli::parse();
    debug!(?args);

    if args.debug_delete_database {
        warn!("Deleting database {}", args.sqlite_connection_string);
        db::delete_database(&args.sqlite_connection_string)?;
    }

    // Run the migrations synchronously before creating the pool or launching the server
    let ran = db::run_migrations(&args.sqlite_connection_string)
        .map_err(|e| anyhow!("Running migrations: {e}"))?;
    info!("Ran {ran} db migrations");

    let pool = db::create_pool(&args.sqlite_connection_string)?;
    let conn = pool.get().await?;

    if args.seed_exercise_catalog {
        let added = conn
            .interact(seed_exercise_catalog)
            .await
            .map_err(|e| anyhow!("Seeding exercise catalog: {e:?}"))??;
        info!("Seeded {added} exercises");
    }

    if let Some(username) = args.promote_admin.clone() {
        let promoted = conn
            .interact(move |conn| {
                let Some(user) = User::fetch_by_username(conn, &username)? else {
                    return Ok(None);
                };
                User::promote_to_admin(conn, &user.id).map(|_| Some(user.username))
            })
            .await
            .map_err(|e| anyhow!("Promoting admin: {e:?}"))??;

        match promoted {
            Some(username) => info!("{username} is now an admin"),
            None => warn!("Can't promote unknown user to admin"),
        }
    }
    drop(conn);

    let socket = SocketAddr::new(args.bind_addr.parse::<IpAddr>()?, args.port);
    let listener = TcpListener::bind(socket).await?;
    debug!("listening on {}", listener.local_addr()?);

    let router = routes::router(AppState::new(pool, args))?;
    axum::serve(listener, router).await?;

    Ok(())
}
