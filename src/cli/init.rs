use colored::Colorize;

use crate::db::{self, create_database};
use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path};

pub fn run(db: Option<String>) -> Result<()> {
    let settings = load_settings().with_overrides(db, None);
    let db_path = settings.database_path();

    let conn = create_database(&db_path)?;
    db::close(conn)?;
    save_settings(&settings)?;

    println!("{} Initialized database at {}", "\u{2713}".green(), db_path.display());
    println!("  Settings saved to {}", settings_path().display());
    Ok(())
}
