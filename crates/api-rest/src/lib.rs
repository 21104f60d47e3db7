//! # API REST
//!
//! REST API implementation for the clinic service.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, API-key header)
//!
//! Uses `api-shared` for wire types and `clinic-core` for everything else.

#![warn(rust_2018_idioms)]

pub mod caller;
pub mod error;
pub mod handlers;

use api_shared::{HealthRes, HealthService};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use clinic_core::{FacilityService, NoteService, PatientService, Store};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use handlers::{facilities, notes, patients};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) store: Store,
    pub(crate) facilities: FacilityService,
    pub(crate) patients: PatientService,
    pub(crate) notes: NoteService,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            facilities: FacilityService::new(store.clone()),
            patients: PatientService::new(store.clone()),
            notes: NoteService::new(store.clone()),
            store,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        facilities::list_facilities,
        facilities::facility_detail,
        facilities::facility_patients,
        facilities::facility_doctors,
        facilities::facility_report,
        facilities::create_patient,
        patients::list_patients,
        patients::search_patients,
        patients::export_patient,
        patients::patient_detail,
        patients::delete_patient,
        patients::patient_notes,
        patients::create_note,
        notes::list_notes,
        notes::note_detail,
        notes::delete_note,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::ErrorRes,
        api_shared::ErrorDetail,
        api_shared::DoctorRes,
        api_shared::FacilityRes,
        api_shared::FacilitySummaryRes,
        api_shared::ListFacilitiesRes,
        api_shared::FacilityDetailRes,
        api_shared::FacilityPatientsRes,
        api_shared::FacilityDoctorsRes,
        api_shared::PatientRes,
        api_shared::ListPatientsRes,
        api_shared::CreatePatientReq,
        api_shared::PatientExportRes,
        api_shared::NoteRes,
        api_shared::ListNotesRes,
        api_shared::PatientNotesRes,
        api_shared::CreateNoteReq,
        api_shared::RiskEntryRes,
        api_shared::ReportRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/facilities", get(facilities::list_facilities))
        .route("/facilities/:id", get(facilities::facility_detail))
        .route(
            "/facilities/:id/patients",
            get(facilities::facility_patients).post(facilities::create_patient),
        )
        .route("/facilities/:id/doctors", get(facilities::facility_doctors))
        .route("/facilities/:id/report", get(facilities::facility_report))
        .route("/patients", get(patients::list_patients))
        .route("/patients/search", get(patients::search_patients))
        .route("/patients/export", get(patients::export_patient))
        .route(
            "/patients/:id",
            get(patients::patient_detail).delete(patients::delete_patient),
        )
        .route(
            "/patients/:id/notes",
            get(patients::patient_notes).post(patients::create_note),
        )
        .route("/notes", get(notes::list_notes))
        .route(
            "/notes/:id",
            get(notes::note_detail).delete(notes::delete_note),
        )
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
pub async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use clinic_core::access::resolve_caller;
    use clinic_core::models::{NoteInput, PatientInput};
    use clinic_core::validation::validate_facility;
    use clinic_core::{DoctorService, FacilityId};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct Seed {
        app: Router,
        state: AppState,
        grey_key: String,
        shepherd_key: String,
        north: FacilityId,
        south: FacilityId,
    }

    fn seeded() -> Seed {
        let store = Store::open_in_memory().unwrap();
        let doctors = DoctorService::new(store.clone());
        let grey = doctors.register("grey", "grey@example.com").unwrap();
        let shepherd = doctors.register("shepherd", "shepherd@example.com").unwrap();

        let state = AppState::new(store);
        let north = state
            .facilities
            .create(validate_facility("North", "1 High St", "555-0100").unwrap())
            .unwrap();
        let south = state
            .facilities
            .create(validate_facility("South", "2 Low Rd", "555-0200").unwrap())
            .unwrap();
        state.facilities.assign_doctor(north.id, "grey").unwrap();
        state.facilities.assign_doctor(south.id, "shepherd").unwrap();

        Seed {
            app: router(state.clone()),
            state,
            grey_key: grey.api_key,
            shepherd_key: shepherd.api_key,
            north: north.id,
            south: south.id,
        }
    }

    fn request(method: &str, uri: &str, key: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header("x-api-key", key);
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn ann() -> Value {
        json!({
            "name": "Ann Lee",
            "age": 80,
            "phone": "555-0101",
            "address": "4 Oak Ave",
            "diagnoses": "diabetes, asthma, copd"
        })
    }

    fn add_patient(seed: &Seed, facility: FacilityId, name: &str, age: i64, diagnoses: &str) {
        let doctor_key = if facility == seed.south {
            &seed.shepherd_key
        } else {
            &seed.grey_key
        };
        let caller = resolve_caller(&seed.state.store, Some(doctor_key.as_str())).unwrap();
        seed.state
            .patients
            .create(
                &caller,
                facility,
                PatientInput {
                    name: Some(name.into()),
                    age: Some(age),
                    phone: Some("555".into()),
                    address: Some("somewhere".into()),
                    diagnoses: Some(diagnoses.into()),
                },
            )
            .unwrap();
    }

    #[tokio::test]
    async fn health_is_ok() {
        let seed = seeded();
        let (status, json) = send(&seed.app, request("GET", "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["ok"], true);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let seed = seeded();
        let (status, json) =
            send(&seed.app, request("GET", "/api-docs/openapi.json", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["paths"]["/facilities/{id}/report"].is_object());
    }

    #[tokio::test]
    async fn create_patient_as_facility_doctor() {
        let seed = seeded();
        let uri = format!("/facilities/{}/patients", seed.north);

        let (status, json) = send(
            &seed.app,
            request("POST", &uri, Some(&seed.grey_key), Some(ann())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["name"], "Ann Lee");
        assert_eq!(json["facility_name"], "North");
        assert_eq!(json["doctor_name"], "grey");

        let id = json["id"].as_i64().unwrap();
        let (status, json) =
            send(&seed.app, request("GET", &format!("/patients/{id}"), None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["age"], 80);
    }

    #[tokio::test]
    async fn create_patient_error_precedence() {
        let seed = seeded();
        let north = format!("/facilities/{}/patients", seed.north);
        let missing = "/facilities/9999/patients";
        let empty = Some(json!({}));

        let cases = [
            (missing, None, StatusCode::UNAUTHORIZED),
            (north.as_str(), Some("not-a-key"), StatusCode::UNAUTHORIZED),
            (missing, Some(seed.grey_key.as_str()), StatusCode::NOT_FOUND),
            (
                north.as_str(),
                Some(seed.shepherd_key.as_str()),
                StatusCode::FORBIDDEN,
            ),
            (north.as_str(), Some(seed.grey_key.as_str()), StatusCode::BAD_REQUEST),
        ];

        for (uri, key, expected) in cases {
            let (status, json) =
                send(&seed.app, request("POST", uri, key, empty.clone())).await;
            assert_eq!(status, expected, "POST {uri} with key {key:?}");
            assert!(json["error"]["code"].is_string());
        }

        let (_, json) = send(&seed.app, request("GET", "/patients", None, None)).await;
        assert_eq!(json["patients"], json!([]));
    }

    #[tokio::test]
    async fn undecodable_body_is_checked_after_guards() {
        let seed = seeded();
        let north = format!("/facilities/{}/patients", seed.north);
        let string_age = Some(json!({"name": "Ann", "age": "70"}));

        let cases = [
            ("/facilities/9999/patients", None, StatusCode::UNAUTHORIZED),
            (north.as_str(), None, StatusCode::UNAUTHORIZED),
            (
                "/facilities/9999/patients",
                Some(seed.grey_key.as_str()),
                StatusCode::NOT_FOUND,
            ),
            (
                north.as_str(),
                Some(seed.shepherd_key.as_str()),
                StatusCode::FORBIDDEN,
            ),
            (north.as_str(), Some(seed.grey_key.as_str()), StatusCode::BAD_REQUEST),
        ];

        for (uri, key, expected) in cases {
            let (status, json) =
                send(&seed.app, request("POST", uri, key, string_age.clone())).await;
            assert_eq!(status, expected, "POST {uri} with key {key:?}");
            assert!(json["error"]["code"].is_string());
        }

        add_patient(&seed, seed.north, "Ann", 40, "");
        let patient = seed.state.patients.list().unwrap()[0].id;
        let notes_uri = format!("/patients/{patient}/notes");
        let bad_note = Some(json!({"note_text": 5}));

        let (status, _) = send(
            &seed.app,
            request("POST", &notes_uri, None, bad_note.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &seed.app,
            request("POST", &notes_uri, Some(&seed.shepherd_key), bad_note.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &seed.app,
            request("POST", &notes_uri, Some(&seed.grey_key), bad_note),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_age_is_reported() {
        let seed = seeded();
        let mut body = ann();
        body["age"] = json!(150);

        let (status, json) = send(
            &seed.app,
            request(
                "POST",
                &format!("/facilities/{}/patients", seed.north),
                Some(&seed.grey_key),
                Some(body),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["message"], "invalid age");
    }

    #[tokio::test]
    async fn report_for_facility() {
        let seed = seeded();
        add_patient(&seed, seed.north, "Ann", 80, "diabetes, asthma, copd, ckd, chf");
        add_patient(&seed, seed.north, "Bob", 30, "asthma");
        add_patient(&seed, seed.south, "Cid", 90, "a,b,c");

        let (status, json) = send(
            &seed.app,
            request("GET", &format!("/facilities/{}/report", seed.north), None, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "avg": 55.0,
                "max": 80,
                "min": 30,
                "diagnoses": {"asthma": 2, "chf": 1, "ckd": 1, "copd": 1, "diabetes": 1},
                "high_risk": [{"name": "Ann", "score": 10}, {"name": "Bob", "score": 0}],
                "total": 2
            })
        );

        let (status, _) =
            send(&seed.app, request("GET", "/facilities/9999/report", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_facility_report_is_zeroed() {
        let seed = seeded();
        let (status, json) = send(
            &seed.app,
            request("GET", &format!("/facilities/{}/report", seed.south), None, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total"], 0);
        assert_eq!(json["avg"], 0.0);
        assert_eq!(json["high_risk"], json!([]));
    }

    #[tokio::test]
    async fn facility_listing_and_detail() {
        let seed = seeded();
        add_patient(&seed, seed.north, "Ann", 40, "");

        let (status, json) = send(&seed.app, request("GET", "/facilities", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        let facilities = json["facilities"].as_array().unwrap();
        assert_eq!(facilities.len(), 2);
        assert_eq!(json["total_facilities"], 2);
        assert_eq!(facilities[0]["facility"]["name"], "North");
        assert_eq!(facilities[0]["patient_count"], 1);

        let (status, json) = send(
            &seed.app,
            request("GET", &format!("/facilities/{}", seed.north), None, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["doctors"][0]["username"], "grey");
        assert_eq!(json["patients"][0]["name"], "Ann");

        let (_, json) = send(
            &seed.app,
            request("GET", &format!("/facilities/{}/doctors", seed.south), None, None),
        )
        .await;
        assert_eq!(json["doctors"][0]["username"], "shepherd");
    }

    #[tokio::test]
    async fn search_treats_input_literally() {
        let seed = seeded();
        add_patient(&seed, seed.north, "Ann Lee", 40, "");
        add_patient(&seed, seed.south, "Anna Berg", 50, "");

        let (status, json) = send(
            &seed.app,
            request("GET", "/patients/search?name=ann&facility=South", None, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["patients"].as_array().unwrap().len(), 1);
        assert_eq!(json["patients"][0]["name"], "Anna Berg");

        let (status, json) = send(
            &seed.app,
            request(
                "GET",
                "/patients/search?name=%27%20OR%20%271%27%3D%271",
                None,
                None,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["patients"], json!([]));

        let (_, json) = send(&seed.app, request("GET", "/patients/search", None, None)).await;
        assert_eq!(json["patients"].as_array().unwrap().len(), 2);

        let (_, json) = send(
            &seed.app,
            request("GET", "/patients/search?name=&facility=South", None, None),
        )
        .await;
        assert_eq!(json["patients"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn export_patient() {
        let seed = seeded();
        add_patient(&seed, seed.north, "Ann Lee", 40, "");
        let id = seed.state.patients.list().unwrap()[0].id;

        let (status, json) = send(
            &seed.app,
            request("GET", &format!("/patients/export?id={id}"), None, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"Name": "Ann Lee", "FacilityName": "North", "DoctorName": "grey", "Age": 40})
        );

        let (status, _) = send(&seed.app, request("GET", "/patients/export", None, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) =
            send(&seed.app, request("GET", "/patients/export?id=9999", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_id_is_a_json_400() {
        let seed = seeded();
        let (status, json) =
            send(&seed.app, request("GET", "/patients/abc", None, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn notes_lifecycle() {
        let seed = seeded();
        add_patient(&seed, seed.north, "Ann", 40, "");
        let patient = seed.state.patients.list().unwrap()[0].id;
        let notes_uri = format!("/patients/{patient}/notes");
        let body = json!({"note_text": "Reviewed bloods", "note_date": "2024-06-01"});

        let (status, _) = send(
            &seed.app,
            request("POST", &notes_uri, None, Some(body.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &seed.app,
            request("POST", &notes_uri, Some(&seed.shepherd_key), Some(body.clone())),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, json) = send(
            &seed.app,
            request("POST", &notes_uri, Some(&seed.grey_key), Some(body)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["note_date"], "2024-06-01");
        assert_eq!(json["created_by"], "grey");
        let note_id = json["id"].as_i64().unwrap();

        let (_, json) = send(&seed.app, request("GET", &notes_uri, None, None)).await;
        assert_eq!(json["patient"]["name"], "Ann");
        assert_eq!(json["notes"].as_array().unwrap().len(), 1);

        let note_uri = format!("/notes/{note_id}");
        let (status, _) = send(
            &seed.app,
            request("DELETE", &note_uri, Some(&seed.shepherd_key), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(
            &seed.app,
            request("DELETE", &note_uri, Some(&seed.grey_key), None),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&seed.app, request("GET", &note_uri, None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_patient_removes_notes() {
        let seed = seeded();
        add_patient(&seed, seed.north, "Ann", 40, "");
        let patient = seed.state.patients.list().unwrap()[0].id;
        let grey = resolve_caller(&seed.state.store, Some(&seed.grey_key)).unwrap();
        seed.state
            .notes
            .create(
                &grey,
                patient,
                NoteInput {
                    note_text: Some("seen".into()),
                    note_date: Some("2024-01-01".into()),
                },
            )
            .unwrap();

        let uri = format!("/patients/{patient}");
        let (status, _) = send(&seed.app, request("DELETE", &uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, json) =
            send(&seed.app, request("DELETE", &uri, Some(&seed.grey_key), None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(json, Value::Null);

        let (status, _) = send(&seed.app, request("GET", &uri, None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, json) = send(&seed.app, request("GET", "/notes", None, None)).await;
        assert_eq!(json["notes"], json!([]));
    }
}
