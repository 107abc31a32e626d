//! Commands on the logged-in user's own rows.

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::Value;
use sheet_client::{HttpTransport, SheetClient};
use sheet_core::{
    AddMyRow, DeleteMyRow, FileUpload, GetAllMyRows, GetMyRow, MergeAction, MergeOptions,
    RefreshMyRow, UpdateMyRow, UploadMyRow,
};
use sheet_types::AccessKey;
use std::path::{Path, PathBuf};

use super::{connect, parse_row, parse_value, print_json, with_lists};

/// `sheet-cli row ...`
#[derive(Subcommand, Debug)]
pub enum RowCommand {
    /// Fetch your row
    Get {
        /// Sheet name
        sheet: String,

        /// Column to match your row on
        #[arg(long)]
        match_with: Option<String>,

        /// Treat COLUMN as a list column in the output (repeatable)
        #[arg(long = "list", value_name = "COLUMN")]
        lists: Vec<String>,
    },

    /// Fetch all your rows
    List {
        /// Sheet name
        sheet: String,

        /// Filter as KEY=VALUE, sent as a query parameter (repeatable)
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Treat COLUMN as a list column in the output (repeatable)
        #[arg(long = "list", value_name = "COLUMN")]
        lists: Vec<String>,
    },

    /// Add a row (optionally merging into an existing one)
    Add {
        /// Sheet name
        sheet: String,

        /// Row as a JSON object
        row: String,

        /// Column holding the owner's username
        #[arg(long)]
        username_field: Option<String>,

        /// Merge into an existing row of yours instead of inserting
        #[arg(long)]
        merge: bool,

        /// Column identifying the row to merge into
        #[arg(long)]
        merge_key: Option<String>,

        /// How to merge: replace, increment or append
        #[arg(long, default_value = "replace")]
        merge_action: String,

        /// Column to add to when merging with `increment`
        #[arg(long, default_value = "quantity")]
        increment_field: String,

        /// Column to extend when merging with `append`
        #[arg(long, default_value = "items")]
        append_field: String,

        /// Insert even when a merge target exists
        #[arg(long)]
        skip_merge: bool,
    },

    /// Patch your row
    Update {
        /// Sheet name
        sheet: String,

        /// Updates as a JSON object
        updates: String,
    },

    /// Delete from your rows
    Delete {
        /// Sheet name
        sheet: String,

        /// Delete mode understood by the server
        #[arg(long)]
        mode: Option<String>,

        /// Field to match
        #[arg(long)]
        field: Option<String>,

        /// Value to match (JSON, or a plain string)
        #[arg(long)]
        value: Option<String>,
    },

    /// Upload a file into a column of your row
    Upload {
        /// Sheet name
        sheet: String,

        /// File to upload
        file: PathBuf,

        /// Column receiving the file URL
        #[arg(long)]
        column: String,

        /// MIME type of the file
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Re-fetch your row
    Refresh {
        /// Sheet name
        sheet: String,

        /// Treat COLUMN as a list column in the output (repeatable)
        #[arg(long = "list", value_name = "COLUMN")]
        lists: Vec<String>,
    },
}

fn parse_filter(filter: &str) -> Result<(String, Value)> {
    let (key, value) = filter
        .split_once('=')
        .with_context(|| format!("filter '{}' must look like KEY=VALUE", filter))?;
    Ok((key.to_string(), Value::String(value.to_string())))
}

/// Execute a row command against any transport.
pub async fn execute<H: HttpTransport>(
    client: &SheetClient<H>,
    access_key: &AccessKey,
    command: RowCommand,
) -> Result<Value> {
    let key = access_key.clone();
    let value = match command {
        RowCommand::Get {
            sheet,
            match_with,
            lists,
        } => {
            let mut request = GetMyRow::new(key, sheet);
            if let Some(column) = match_with {
                request = request.match_with(column);
            }
            with_lists(client.get_my_row(&request).await?, &lists)
        }
        RowCommand::List {
            sheet,
            filters,
            lists,
        } => {
            let mut request = GetAllMyRows::new(key, sheet);
            for filter in &filters {
                let (k, v) = parse_filter(filter)?;
                request = request.filter(k, v);
            }
            with_lists(client.get_all_my_rows(&request).await?, &lists)
        }
        RowCommand::Add {
            sheet,
            row,
            username_field,
            merge,
            merge_key,
            merge_action,
            increment_field,
            append_field,
            skip_merge,
        } => {
            let merge_action: MergeAction = merge_action.parse().map_err(anyhow::Error::msg)?;
            let options = MergeOptions {
                username_field,
                merge_user_rows: merge,
                merge_key,
                merge_action,
                increment_field,
                append_field,
                skip_merge,
            };
            let request = AddMyRow::new(key, sheet, parse_row(&row, "row")?).with_options(options);
            client.add_my_row(&request).await?
        }
        RowCommand::Update { sheet, updates } => {
            let request = UpdateMyRow::new(key, sheet, parse_row(&updates, "updates")?);
            client.update_my_row(&request).await?
        }
        RowCommand::Delete {
            sheet,
            mode,
            field,
            value,
        } => {
            let request = DeleteMyRow {
                mode,
                field,
                value: value.as_deref().map(parse_value),
                ..DeleteMyRow::new(key, sheet)
            };
            client.delete_my_row(&request).await?
        }
        RowCommand::Upload {
            sheet,
            file,
            column,
            content_type,
        } => {
            let upload = read_upload(&file, content_type).await?;
            let request = UploadMyRow::new(key, sheet, upload, column);
            Value::String(client.upload_my_row(&request).await?)
        }
        RowCommand::Refresh { sheet, lists } => {
            let request = RefreshMyRow::new(key, sheet);
            with_lists(client.refresh_my_row(&request).await?, &lists)
        }
    };
    Ok(value)
}

async fn read_upload(path: &Path, content_type: Option<String>) -> Result<FileUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let mut upload = FileUpload::new(file_name, bytes);
    if let Some(content_type) = content_type {
        upload = upload.with_content_type(content_type);
    }
    Ok(upload)
}

/// Run a row command.
pub async fn run(data_dir: &Path, base_url: Option<&str>, command: RowCommand) -> Result<()> {
    let (profile, client) = connect(data_dir, base_url).await?;
    let value = execute(&client, &profile.access_key, command).await?;
    print_json(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sheet_client::{ClientConfig, MockHttp};
    use sheet_core::{CallBody, Method};

    fn client() -> (SheetClient<MockHttp>, MockHttp) {
        let http = MockHttp::new();
        (SheetClient::new(ClientConfig::default(), http.clone()), http)
    }

    fn key() -> AccessKey {
        AccessKey::new("ak")
    }

    #[tokio::test]
    async fn list_sends_filters_and_normalizes() {
        let (client, http) = client();
        http.queue_json(json!({"success": true, "data": [{"tags": "a,b"}]}));

        let value = execute(
            &client,
            &key(),
            RowCommand::List {
                sheet: "orders".into(),
                filters: vec!["status=open".into()],
                lists: vec!["tags".into()],
            },
        )
        .await
        .unwrap();

        assert_eq!(value, json!([{"tags": ["a", "b"]}]));
        assert!(http
            .last_request()
            .unwrap()
            .url
            .ends_with("/user-row/ak/orders?mode=all&status=open"));
    }

    #[tokio::test]
    async fn bad_filter_fails_before_sending() {
        let (client, http) = client();
        let result = execute(
            &client,
            &key(),
            RowCommand::List {
                sheet: "orders".into(),
                filters: vec!["nonsense".into()],
                lists: vec![],
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn add_parses_merge_action() {
        let (client, http) = client();
        http.queue_json(json!({"success": true, "data": {"id": 1}}));

        execute(
            &client,
            &key(),
            RowCommand::Add {
                sheet: "cart".into(),
                row: r#"{"sku":"A1","items":["x"]}"#.into(),
                username_field: None,
                merge: true,
                merge_key: Some("sku".into()),
                merge_action: "append".into(),
                increment_field: "quantity".into(),
                append_field: "items".into(),
                skip_merge: false,
            },
        )
        .await
        .unwrap();

        let CallBody::Json(body) = http.last_request().unwrap().body else {
            panic!("expected JSON body");
        };
        assert_eq!(body["mergeAction"], "append");
        assert_eq!(body["row"]["sku"], "A1");
    }

    #[tokio::test]
    async fn add_rejects_unknown_merge_action() {
        let (client, http) = client();
        let result = execute(
            &client,
            &key(),
            RowCommand::Add {
                sheet: "cart".into(),
                row: "{}".into(),
                username_field: None,
                merge: false,
                merge_key: None,
                merge_action: "explode".into(),
                increment_field: "quantity".into(),
                append_field: "items".into(),
                skip_merge: false,
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn delete_parses_value() {
        let (client, http) = client();
        http.queue_json(json!({"success": true, "data": {"deleted": 1}}));

        execute(
            &client,
            &key(),
            RowCommand::Delete {
                sheet: "orders".into(),
                mode: Some("single".into()),
                field: Some("id".into()),
                value: Some("7".into()),
            },
        )
        .await
        .unwrap();

        let request = http.last_request().unwrap();
        assert_eq!(request.method, Method::Delete);
        assert_eq!(
            request.body,
            CallBody::Json(json!({"mode": "single", "field": "id", "value": 7}))
        );
    }

    #[tokio::test]
    async fn upload_reads_file_and_returns_url() {
        let (client, http) = client();
        http.queue_json(json!({"success": true, "url": "https://cdn/x.png"}));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.png");
        tokio::fs::write(&path, [1u8, 2, 3]).await.unwrap();

        let value = execute(
            &client,
            &key(),
            RowCommand::Upload {
                sheet: "profiles".into(),
                file: path,
                column: "avatar".into(),
                content_type: Some("image/png".into()),
            },
        )
        .await
        .unwrap();

        assert_eq!(value, json!("https://cdn/x.png"));
        let CallBody::Multipart(form) = http.last_request().unwrap().body else {
            panic!("expected multipart body");
        };
        assert_eq!(form.file.file_name, "x.png");
        assert_eq!(form.file.bytes, vec![1, 2, 3]);
        assert_eq!(form.file.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn upload_missing_file_fails_before_sending() {
        let (client, http) = client();
        let result = execute(
            &client,
            &key(),
            RowCommand::Upload {
                sheet: "profiles".into(),
                file: PathBuf::from("/definitely/not/here.png"),
                column: "avatar".into(),
                content_type: None,
            },
        )
        .await;
        assert!(result.is_err());
        assert_eq!(http.request_count(), 0);
    }
}
