//! JSON command surface.
//!
//! Every command takes a JSON payload and answers with a [`Response`]. Failures never escape as
//! errors.

use gymminder_domain::{
    self as domain, ArtifactRepository, DeleteError, ExportDialog, ExportError,
    HistoryRepository, RandomSource, ReadError, RoutineID, RoutineRequest, Service,
};
use gymminder_storage::model;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

pub const SAVED: &str = "루틴이 성공적으로 저장되었습니다!";
pub const EXPORTED: &str = "루틴이 성공적으로 내보내졌습니다!";
pub const EXPORT_CANCELLED: &str = "내보내기가 취소되었습니다.";
pub const DELETED: &str = "루틴이 삭제되었습니다.";
pub const NOT_FOUND: &str = "루틴을 찾을 수 없습니다.";

pub const COMMANDS: [&str; 8] = [
    "generate-routine",
    "save-routine",
    "load-history",
    "search-history",
    "view-routine",
    "export-routine",
    "delete-routine",
    "prune-routines",
];

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }

    fn data(data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                success: true,
                message: None,
                data: Some(data),
            },
            Err(err) => Self::failure(format!("응답을 만드는 중 오류가 발생했습니다: {err}")),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    fn with_data(mut self, data: impl Serialize) -> Self {
        self.data = serde_json::to_value(data).ok();
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRoutine {
    split_type: String,
    #[serde(default)]
    yesterday_muscles: Vec<String>,
    #[serde(default)]
    sore_muscles: Vec<String>,
}

#[derive(Deserialize)]
struct SearchHistory {
    #[serde(default)]
    term: String,
}

pub async fn invoke<R, D>(
    service: &Service<R>,
    dialog: &D,
    random: &mut impl RandomSource,
    command: &str,
    payload: Value,
) -> Response
where
    R: HistoryRepository + ArtifactRepository + Clone,
    D: ExportDialog,
{
    let result = match command {
        "generate-routine" => generate_routine(service, random, payload),
        "save-routine" => save_routine(service, payload).await,
        "load-history" => load_history(service).await,
        "search-history" => search_history(service, payload).await,
        "view-routine" => view_routine(service, &payload).await,
        "export-routine" => export_routine(service, dialog, payload).await,
        "delete-routine" => delete_routine(service, &payload).await,
        "prune-routines" => prune_routines(service).await,
        _ => Ok(Response::failure(format!("알 수 없는 명령입니다: {command}"))),
    };
    result.unwrap_or_else(|message| Response::failure(format!("잘못된 요청입니다: {message}")))
}

fn generate_routine<R>(
    service: &Service<R>,
    random: &mut impl RandomSource,
    payload: Value,
) -> Result<Response, String>
where
    R: HistoryRepository + ArtifactRepository + Clone,
{
    let GenerateRoutine {
        split_type,
        yesterday_muscles,
        sore_muscles,
    } = parse(payload)?;
    let request = RoutineRequest::parse(&split_type, &yesterday_muscles, &sore_muscles)
        .map_err(|err| err.to_string())?;
    let routine = service.generate_routine(&request, random);
    Ok(Response::data(model::Routine::from(&routine)))
}

async fn save_routine<R>(service: &Service<R>, payload: Value) -> Result<Response, String>
where
    R: HistoryRepository + ArtifactRepository + Clone,
{
    let routine = routine(payload)?;
    Ok(match service.save_routine(&routine).await {
        Ok(entry) => Response::success(SAVED)
            .with_data(model::HistoryEntry::from(&entry)),
        Err(err) => Response::failure(format!("저장 중 오류가 발생했습니다: {err}")),
    })
}

async fn load_history<R>(service: &Service<R>) -> Result<Response, String>
where
    R: HistoryRepository + ArtifactRepository + Clone,
{
    Ok(match service.load_history().await {
        Ok(entries) => Response::data(history(&entries)),
        Err(err) => Response::failure(format!("히스토리 로드 중 오류가 발생했습니다: {err}")),
    })
}

/// Reloads the history before searching, as every command may run in a fresh process.
async fn search_history<R>(service: &Service<R>, payload: Value) -> Result<Response, String>
where
    R: HistoryRepository + ArtifactRepository + Clone,
{
    let SearchHistory { term } = if payload.is_null() {
        SearchHistory {
            term: String::new(),
        }
    } else {
        parse(payload)?
    };
    Ok(match service.load_history().await {
        Ok(_) => Response::data(history(&service.search_history(&term))),
        Err(err) => Response::failure(format!("히스토리 로드 중 오류가 발생했습니다: {err}")),
    })
}

async fn view_routine<R>(service: &Service<R>, payload: &Value) -> Result<Response, String>
where
    R: HistoryRepository + ArtifactRepository + Clone,
{
    let id = routine_id(payload)?;
    Ok(match service.view_routine(&id).await {
        Ok(routine) => Response::data(model::Routine::from(&routine)),
        Err(ReadError::NotFound) => Response::failure(NOT_FOUND),
        Err(err) => Response::failure(format!("루틴을 읽는 중 오류가 발생했습니다: {err}")),
    })
}

async fn export_routine<R, D>(
    service: &Service<R>,
    dialog: &D,
    payload: Value,
) -> Result<Response, String>
where
    R: HistoryRepository + ArtifactRepository + Clone,
    D: ExportDialog,
{
    let routine = routine(payload)?;
    Ok(match service.export_routine(&routine, dialog).await {
        Ok(path) => Response::success(EXPORTED).with_data(path),
        Err(ExportError::Cancelled) => Response::failure(EXPORT_CANCELLED),
        Err(err) => Response::failure(format!("내보내기 중 오류가 발생했습니다: {err}")),
    })
}

async fn delete_routine<R>(service: &Service<R>, payload: &Value) -> Result<Response, String>
where
    R: HistoryRepository + ArtifactRepository + Clone,
{
    let id = routine_id(payload)?;
    Ok(match service.delete_routine(&id).await {
        Ok(entry) => {
            Response::success(DELETED).with_data(model::HistoryEntry::from(&entry))
        }
        Err(DeleteError::NotFound) => Response::failure(NOT_FOUND),
        Err(err) => Response::failure(format!("Failed to delete routine: {err}")),
    })
}

async fn prune_routines<R>(service: &Service<R>) -> Result<Response, String>
where
    R: HistoryRepository + ArtifactRepository + Clone,
{
    Ok(match service.prune_orphans().await {
        Ok(removed) => Response::success(format!(
            "참조되지 않은 루틴 파일 {}개를 삭제했습니다.",
            removed.len()
        ))
        .with_data(removed),
        Err(err) => Response::failure(format!("정리 중 오류가 발생했습니다: {err}")),
    })
}

fn parse<T: DeserializeOwned>(payload: Value) -> Result<T, String> {
    serde_json::from_value(payload).map_err(|err| err.to_string())
}

fn routine(payload: Value) -> Result<domain::Routine, String> {
    domain::Routine::try_from(parse::<model::Routine>(payload)?).map_err(|err| err.to_string())
}

/// Accepts a bare id, a numeric legacy id or an object with an `id` field.
fn routine_id(payload: &Value) -> Result<RoutineID, String> {
    match payload {
        Value::String(id) if !id.is_empty() => Ok(RoutineID::from(id.as_str())),
        Value::Number(id) => Ok(RoutineID::from(id.to_string())),
        Value::Object(object) => match object.get("id") {
            Some(id @ (Value::String(_) | Value::Number(_))) => routine_id(id),
            _ => Err("missing routine id".to_string()),
        },
        _ => Err("missing routine id".to_string()),
    }
}

fn history(entries: &[domain::HistoryEntry]) -> Vec<model::HistoryEntry> {
    entries.iter().map(model::HistoryEntry::from).collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use gymminder_domain::Options;
    use gymminder_storage::Storage;
    use pretty_assertions::assert_eq;
    use rand::{SeedableRng, rngs::StdRng};
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    struct Dialog(Option<PathBuf>);

    impl ExportDialog for Dialog {
        async fn choose_destination(&self, _: &str) -> Option<PathBuf> {
            self.0.clone()
        }
    }

    struct Context {
        dir: TempDir,
        service: Service<Storage>,
        random: StdRng,
    }

    impl Context {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let service = Service::new(Storage::new(dir.path()), Options::default());
            Self {
                dir,
                service,
                random: StdRng::seed_from_u64(7),
            }
        }

        async fn invoke(&mut self, command: &str, payload: Value) -> Response {
            self.invoke_with(&Dialog(None), command, payload).await
        }

        async fn invoke_with(&mut self, dialog: &Dialog, command: &str, payload: Value) -> Response {
            invoke(&self.service, dialog, &mut self.random, command, payload).await
        }

        async fn generate(&mut self, split_type: &str) -> Value {
            self.invoke("generate-routine", json!({ "splitType": split_type }))
                .await
                .data
                .unwrap()
        }
    }

    #[test]
    fn test_response_json() {
        assert_eq!(
            serde_json::to_value(Response::failure(EXPORT_CANCELLED)).unwrap(),
            json!({ "success": false, "message": "내보내기가 취소되었습니다." })
        );
        assert_eq!(
            serde_json::to_value(Response::data(json!([]))).unwrap(),
            json!({ "success": true, "data": [] })
        );
    }

    #[tokio::test]
    async fn test_generate_routine() {
        let mut context = Context::new();

        let response = context
            .invoke(
                "generate-routine",
                json!({
                    "splitType": "bro",
                    "yesterdayMuscles": ["chest", "triceps"],
                    "soreMuscles": []
                }),
            )
            .await;

        assert!(response.success);
        let data = response.data.unwrap();
        assert_eq!(data["splitType"], json!("브로 분할"));
        assert_eq!(data["estimatedTime"], json!(5));
        assert_eq!(data["exercises"].as_array().unwrap().len(), 1);
        assert_eq!(data["exercises"][0]["muscle"], json!("복근"));
    }

    #[rstest]
    #[case("generate-routine", json!({ "splitType": "cardio" }))]
    #[case("generate-routine", json!({ "splitType": "bro", "soreMuscles": ["neck"] }))]
    #[case("generate-routine", json!(null))]
    #[case("save-routine", json!({ "id": "1" }))]
    #[case("view-routine", json!(null))]
    #[case("delete-routine", json!({ "name": "1" }))]
    #[case("search-history", json!({ "term": 1 }))]
    #[tokio::test]
    async fn test_invalid_request(#[case] command: &str, #[case] payload: Value) {
        let mut context = Context::new();

        let response = context.invoke(command, payload).await;

        assert!(!response.success);
        assert!(
            response
                .message
                .unwrap()
                .starts_with("잘못된 요청입니다: ")
        );
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mut context = Context::new();

        assert_eq!(
            context.invoke("edit-routine", json!(null)).await,
            Response::failure("알 수 없는 명령입니다: edit-routine")
        );
    }

    #[tokio::test]
    async fn test_save_load_view_delete() {
        let mut context = Context::new();
        let routine = context.generate("fullbody").await;

        let response = context.invoke("save-routine", routine.clone()).await;
        assert!(response.success);
        assert_eq!(
            response.message.as_deref(),
            Some(SAVED)
        );
        let entry = response.data.unwrap();
        assert_eq!(entry["id"], routine["id"]);
        assert_eq!(entry["exerciseCount"], json!(7));
        assert_eq!(entry["estimatedTime"], json!(35));

        let history = context.invoke("load-history", json!(null)).await;
        assert_eq!(history.data, Some(json!([entry])));

        let viewed = context
            .invoke("view-routine", json!({ "id": routine["id"] }))
            .await;
        assert_eq!(viewed.data, Some(routine.clone()));

        let deleted = context.invoke("delete-routine", routine["id"].clone()).await;
        assert!(deleted.success);
        assert_eq!(deleted.message.as_deref(), Some(DELETED));
        assert!(
            !context
                .dir
                .path()
                .join("data/routines")
                .join(entry["fileName"].as_str().unwrap())
                .exists()
        );

        assert_eq!(
            context.invoke("load-history", json!(null)).await.data,
            Some(json!([]))
        );
        assert_eq!(
            context.invoke("delete-routine", routine["id"].clone()).await,
            Response::failure(NOT_FOUND)
        );
        assert_eq!(
            context.invoke("view-routine", routine["id"].clone()).await,
            Response::failure(NOT_FOUND)
        );
    }

    #[tokio::test]
    async fn test_search_history() {
        let mut context = Context::new();
        for split_type in ["bro", "fullbody"] {
            let routine = context.generate(split_type).await;
            assert!(context.invoke("save-routine", routine).await.success);
        }

        let all = context.invoke("search-history", json!(null)).await.data.unwrap();
        assert_eq!(all.as_array().unwrap().len(), 2);

        let found = context
            .invoke("search-history", json!({ "term": "전신" }))
            .await
            .data
            .unwrap();
        assert_eq!(found.as_array().unwrap().len(), 1);
        assert_eq!(found[0]["splitType"], json!("전신"));

        assert_eq!(
            context
                .invoke("search-history", json!({ "term": "xyz" }))
                .await
                .data,
            Some(json!([]))
        );
    }

    #[tokio::test]
    async fn test_export_routine() {
        let mut context = Context::new();
        let routine = context.generate("upperlower").await;
        let path = context.dir.path().join("export.json");

        assert_eq!(
            context.invoke("export-routine", routine.clone()).await,
            Response::failure(EXPORT_CANCELLED)
        );

        let response = context
            .invoke_with(&Dialog(Some(path.clone())), "export-routine", routine.clone())
            .await;
        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some(EXPORTED));
        assert_eq!(response.data, Some(json!(path)));
        let exported: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(exported, routine);

        let response = context
            .invoke_with(
                &Dialog(Some(context.dir.path().join("missing/dir/export.json"))),
                "export-routine",
                routine,
            )
            .await;
        assert!(!response.success);
        assert!(
            response
                .message
                .unwrap()
                .starts_with("내보내기 중 오류가 발생했습니다: ")
        );
    }

    #[tokio::test]
    async fn test_prune_routines() {
        let mut context = Context::new();
        let routines_dir = context.dir.path().join("data/routines");
        std::fs::create_dir_all(&routines_dir).unwrap();
        std::fs::write(routines_dir.join("routine_orphan.json"), "{}").unwrap();

        let response = context.invoke("prune-routines", json!(null)).await;

        assert!(response.success);
        assert_eq!(response.data, Some(json!(["routine_orphan.json"])));
        assert!(!routines_dir.join("routine_orphan.json").exists());
    }

    #[rstest]
    #[case(json!("0196"), Ok(RoutineID::from("0196")))]
    #[case(json!(1_700_000_000_000_u64), Ok(RoutineID::from("1700000000000")))]
    #[case(json!({ "id": "0196" }), Ok(RoutineID::from("0196")))]
    #[case(json!(""), Err("missing routine id".to_string()))]
    #[case(json!([]), Err("missing routine id".to_string()))]
    fn test_routine_id(#[case] payload: Value, #[case] expected: Result<RoutineID, String>) {
        assert_eq!(routine_id(&payload), expected);
    }
}
