use database_migration::{Migrator, MigratorTrait};
use sea_orm_migration::sea_orm::{Database, DbErr};

enum ActionEnum {
    Up,
    Down,
    Fresh,
}

const CONFIG_ENV_PREFIX: &str = "MIGRATION";
const CONFIG_ENV_SEPARATOR: &str = "__";
const CONFIG: &str = "config";
const ACTION_KEY: &str = "migrate.action";
const ACTION_UP: &str = "up";
const ACTION_DOWN: &str = "down";
const ACTION_FRESH: &str = "fresh";
const DB_CON: &str = "migrate.dbcon";

#[tokio::main]
async fn main() {
    let config = match config::Config::builder()
        .add_source(
            config::File::with_name(CONFIG).required(false).format(config::FileFormat::Yaml),
        )
        .add_source(
            config::Environment::with_prefix(CONFIG_ENV_PREFIX).separator(CONFIG_ENV_SEPARATOR),
        )
        .build()
    {
        Ok(x) => x,
        Err(e) => return eprintln!("Cannot build config: {e}"),
    };
    let (action, db_con) = match (config.get_string(ACTION_KEY), config.get_string(DB_CON)) {
        (Ok(action), Ok(db_con)) => (action, db_con),
        (Err(e), _) | (_, Err(e)) => return eprintln!("Missing migration setting: {e}"),
    };
    let action = match action.as_str() {
        ACTION_UP => ActionEnum::Up,
        ACTION_DOWN => ActionEnum::Down,
        ACTION_FRESH => ActionEnum::Fresh,
        _ => {
            return eprintln!(
                "{ACTION_KEY} must be one of {ACTION_UP}, {ACTION_DOWN} or {ACTION_FRESH}, got {action}"
            );
        }
    };
    if let Err(e) = exe_db_action(action, &db_con).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}

async fn exe_db_action(action: ActionEnum, db_con: &str) -> Result<(), DbErr> {
    let db = Database::connect(db_con).await?;
    match action {
        ActionEnum::Up => Migrator::up(&db, None).await,
        ActionEnum::Down => Migrator::down(&db, None).await,
        ActionEnum::Fresh => Migrator::fresh(&db).await,
    }
}
