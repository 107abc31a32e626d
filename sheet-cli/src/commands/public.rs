//! Commands on rows owned by other users.

use anyhow::Result;
use clap::Subcommand;
use serde_json::Value;
use sheet_client::{HttpTransport, SheetClient};
use sheet_core::{DeletePublicRow, GetPublicRow, GetPublicUserRows, UpdatePublicRow, DEFAULT_ROLE};
use sheet_types::AccessKey;
use std::path::Path;

use super::{connect, parse_row, parse_value, print_json, with_lists};

/// `sheet-cli public ...`
#[derive(Subcommand, Debug)]
pub enum PublicCommand {
    /// Fetch public rows of a sheet
    List {
        /// Sheet name
        sheet: String,

        /// Column to match on (needs --match-value)
        #[arg(long, requires = "match_value")]
        match_with: Option<String>,

        /// Value to match (needs --match-with)
        #[arg(long, requires = "match_with")]
        match_value: Option<String>,

        /// Fetch mode; empty to omit
        #[arg(long, default_value = "all")]
        mode: String,

        /// Treat COLUMN as a list column in the output (repeatable)
        #[arg(long = "list", value_name = "COLUMN")]
        lists: Vec<String>,
    },

    /// Fetch one public row
    Get {
        /// Sheet name
        sheet: String,

        /// Column to match on (needs --match-value)
        #[arg(long, requires = "match_value")]
        match_with: Option<String>,

        /// Value to match (needs --match-with)
        #[arg(long, requires = "match_with")]
        match_value: Option<String>,

        /// Treat COLUMN as a list column in the output (repeatable)
        #[arg(long = "list", value_name = "COLUMN")]
        lists: Vec<String>,
    },

    /// Patch a public row
    Update {
        /// Sheet name
        sheet: String,

        /// Target row id
        row_id: String,

        /// Updates as a JSON object
        updates: String,

        /// Role to act as
        #[arg(long, default_value = DEFAULT_ROLE)]
        role: String,
    },

    /// Remove a value from an array column of a public row
    Remove {
        /// Sheet name
        sheet: String,

        /// Array column
        #[arg(long)]
        field: String,

        /// Value to remove (JSON, or a plain string)
        #[arg(long)]
        value: String,

        /// Target row id
        #[arg(long, required_unless_present = "uuid")]
        row_id: Option<String>,

        /// Owner uuid, used when no row id is given
        #[arg(long)]
        uuid: Option<String>,

        /// Role to act as
        #[arg(long, default_value = DEFAULT_ROLE)]
        role: String,
    },
}

/// Execute a public-row command against any transport.
pub async fn execute<H: HttpTransport>(
    client: &SheetClient<H>,
    access_key: &AccessKey,
    command: PublicCommand,
) -> Result<Value> {
    let key = access_key.clone();
    let value = match command {
        PublicCommand::List {
            sheet,
            match_with,
            match_value,
            mode,
            lists,
        } => {
            let request = GetPublicUserRows {
                match_with,
                match_value,
                ..GetPublicUserRows::new(key, sheet).with_mode(mode)
            };
            with_lists(client.get_public_user_rows(&request).await?, &lists)
        }
        PublicCommand::Get {
            sheet,
            match_with,
            match_value,
            lists,
        } => {
            let request = GetPublicRow {
                match_with,
                match_value,
                ..GetPublicRow::new(key, sheet)
            };
            with_lists(client.get_public_row(&request).await?, &lists)
        }
        PublicCommand::Update {
            sheet,
            row_id,
            updates,
            role,
        } => {
            let request = UpdatePublicRow::new(key, sheet, row_id, parse_row(&updates, "updates")?)
                .with_role(role);
            client.update_public_row(&request).await?
        }
        PublicCommand::Remove {
            sheet,
            field,
            value,
            row_id,
            uuid,
            role,
        } => {
            let request = DeletePublicRow {
                access_key: key,
                sheet_name: sheet,
                uuid,
                row_id,
                field,
                value: Some(parse_value(&value)),
                role,
            };
            client.delete_public_row(&request).await?
        }
    };
    Ok(value)
}

/// Run a public-row command.
pub async fn run(data_dir: &Path, base_url: Option<&str>, command: PublicCommand) -> Result<()> {
    let (profile, client) = connect(data_dir, base_url).await?;
    let value = execute(&client, &profile.access_key, command).await?;
    print_json(&value)
}
