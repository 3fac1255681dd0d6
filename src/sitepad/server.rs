//! # Admin Gateway
//!
//! Maps the admin REST surface onto the API facade over a synchronous
//! [`tiny_http`] accept loop. One request is processed at a time, which is
//! the concurrency model the pipeline is written for: each operation is a
//! single validate → load → merge → persist → regenerate pass with no
//! coordination against other operations.
//!
//! Authentication is a bearer credential checked through the pluggable
//! [`CredentialVerifier`](crate::auth::CredentialVerifier); a verified
//! credential mints an explicit [`Session`](crate::auth::Session) that is
//! carried through request context. `GET /health` is the only
//! unauthenticated route.

use crate::api::SiteApi;
use crate::auth::{authorize, bearer_token, RequestContext, Session, StaticPasscode};
use crate::commands::{MessageLevel, OpResult};
use crate::config::SitepadConfig;
use crate::error::{Result, SitepadError};
use crate::model::{ContentDocument, MediaDraft, PageName, ProjectDraft, SettingsDocument};
use crate::store::DocumentStore;
use chrono::Utc;
use serde_json::{json, Map, Value};
use std::fs;
use std::io::Read;

pub struct HttpReply {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
    pub extra_headers: Vec<(String, String)>,
}

impl HttpReply {
    fn json(status: u16, value: Value) -> Self {
        Self {
            status,
            content_type: "application/json".to_string(),
            body: value.to_string().into_bytes(),
            extra_headers: Vec::new(),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "error": message.into() }))
    }

    fn from_err(err: SitepadError) -> Self {
        Self::error(err.status_code(), err.to_string())
    }
}

pub struct AdminServer<S: DocumentStore> {
    api: SiteApi<S>,
    session: Option<Session>,
    session_timeout_minutes: i64,
}

impl<S: DocumentStore> AdminServer<S> {
    pub fn new(api: SiteApi<S>, config: &SitepadConfig) -> Self {
        Self {
            api,
            session: None,
            session_timeout_minutes: config.session_timeout_minutes,
        }
    }

    /// Bind and serve until the process is stopped.
    pub fn run(mut self, bind_addr: &str) -> Result<()> {
        let server = tiny_http::Server::http(bind_addr)
            .map_err(|e| SitepadError::Store(format!("Could not bind {}: {}", bind_addr, e)))?;

        for mut request in server.incoming_requests() {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);

            let auth = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Authorization"))
                .map(|h| h.value.as_str().to_string());

            let method = request.method().to_string().to_uppercase();
            let url = request.url().to_string();
            let reply = self.handle(&method, &url, auth.as_deref(), &body);

            let mut response =
                tiny_http::Response::from_data(reply.body).with_status_code(reply.status);
            if let Ok(header) = tiny_http::Header::from_bytes(
                &b"Content-Type"[..],
                reply.content_type.as_bytes(),
            ) {
                response = response.with_header(header);
            }
            for (field, value) in &reply.extra_headers {
                if let Ok(header) =
                    tiny_http::Header::from_bytes(field.as_bytes(), value.as_bytes())
                {
                    response = response.with_header(header);
                }
            }
            let _ = request.respond(response);
        }
        Ok(())
    }

    /// Route one request. Split out from the accept loop so the surface
    /// can be exercised without sockets.
    pub fn handle(
        &mut self,
        method: &str,
        raw_url: &str,
        auth_header: Option<&str>,
        body: &str,
    ) -> HttpReply {
        let (path, query) = match raw_url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (raw_url, ""),
        };
        // the admin surface historically lived under /api
        let path = path.strip_prefix("/api").unwrap_or(path);

        if path == "/health" {
            return match method {
                "GET" => HttpReply::json(200, json!({ "status": "ok" })),
                _ => HttpReply::error(405, "Method not allowed"),
            };
        }

        let ctx = match self.authenticate(auth_header) {
            Some(ctx) => ctx,
            None => return HttpReply::error(401, "Unauthorized"),
        };

        match self.dispatch(&ctx, method, path, query, body) {
            Ok(reply) => reply,
            Err(err) => HttpReply::from_err(err),
        }
    }

    fn authenticate(&mut self, auth_header: Option<&str>) -> Option<RequestContext> {
        let presented = auth_header.and_then(bearer_token)?;
        let verifier = StaticPasscode::new(self.api.admin_passcode().ok()?);
        let session = authorize(
            presented,
            self.session.take(),
            &verifier,
            Utc::now(),
            self.session_timeout_minutes,
        )?;
        self.session = Some(session.clone());
        Some(RequestContext { session })
    }

    fn dispatch(
        &mut self,
        _ctx: &RequestContext,
        method: &str,
        path: &str,
        query: &str,
        body: &str,
    ) -> Result<HttpReply> {
        match (method, path) {
            ("GET", "/portfolio") => {
                let result = self.api.portfolio()?;
                Ok(HttpReply::json(
                    200,
                    serde_json::to_value(result.portfolio.unwrap_or_default())?,
                ))
            }
            ("POST", "/portfolio") => {
                let draft: ProjectDraft = parse_body(body)?;
                let result = self.api.add_project(draft)?;
                let mut reply = json!({
                    "success": true,
                    "project": serde_json::to_value(&result.project)?,
                });
                attach_warnings(&mut reply, &result);
                Ok(HttpReply::json(200, reply))
            }
            ("PUT", "/portfolio") => {
                let updates: Map<String, Value> = parse_body(body)?;
                let result = self.api.update_project(updates)?;
                Ok(HttpReply::json(200, success_reply(&result)))
            }
            ("DELETE", "/portfolio") => {
                let id: i64 = query_param(query, "id")
                    .and_then(|v| v.parse().ok())
                    .ok_or_else(|| SitepadError::Validation("Missing or invalid id".into()))?;
                let result = self.api.delete_project(id)?;
                Ok(HttpReply::json(200, success_reply(&result)))
            }

            ("GET", "/content") => {
                let result = self.api.content()?;
                Ok(HttpReply::json(
                    200,
                    Value::Object(result.content.unwrap_or_default()),
                ))
            }
            ("POST", "/content") => {
                let doc: ContentDocument = parse_body(body)?;
                let result = self.api.replace_content(doc)?;
                Ok(HttpReply::json(200, success_reply(&result)))
            }
            ("PUT", "/content") => {
                #[derive(serde::Deserialize)]
                struct SectionUpdate {
                    page: String,
                    section: String,
                    data: Value,
                }
                let update: SectionUpdate = parse_body(body)?;
                let result = self
                    .api
                    .update_section(&update.page, &update.section, update.data)?;
                Ok(HttpReply::json(200, success_reply(&result)))
            }

            ("GET", "/media") => {
                let result = self.api.media()?;
                Ok(HttpReply::json(
                    200,
                    serde_json::to_value(result.media.unwrap_or_default())?,
                ))
            }
            ("POST", "/media") => {
                let draft: MediaDraft = parse_body(body)?;
                let result = self.api.add_media(draft)?;
                let item = result.media.as_ref().and_then(|m| m.first());
                let mut reply = json!({
                    "success": true,
                    "item": serde_json::to_value(item)?,
                });
                attach_warnings(&mut reply, &result);
                Ok(HttpReply::json(200, reply))
            }
            ("PUT", "/media") => {
                #[derive(serde::Deserialize)]
                struct MediaUpdate {
                    id: String,
                    updates: Map<String, Value>,
                }
                let update: MediaUpdate = parse_body(body)?;
                let result = self.api.update_media(&update.id, update.updates)?;
                Ok(HttpReply::json(200, success_reply(&result)))
            }
            ("DELETE", "/media") => {
                let id = query_param(query, "id")
                    .ok_or_else(|| SitepadError::Validation("Missing or invalid id".into()))?;
                let result = self.api.delete_media(&id)?;
                Ok(HttpReply::json(200, success_reply(&result)))
            }
            ("PATCH", "/media") => {
                #[derive(serde::Deserialize)]
                struct BulkOp {
                    operation: String,
                    #[serde(default)]
                    items: Vec<String>,
                }
                let op: BulkOp = parse_body(body)?;
                if op.operation != "delete" {
                    return Err(SitepadError::Validation("Unsupported operation".into()));
                }
                let result = self.api.bulk_delete_media(&op.items)?;
                let removed = result.removed.unwrap_or(0);
                let mut reply = json!({
                    "success": true,
                    "message": format!("Deleted {} items", removed),
                    "removed": removed,
                });
                attach_warnings(&mut reply, &result);
                Ok(HttpReply::json(200, reply))
            }

            ("GET", "/settings") => {
                let result = self.api.settings()?;
                Ok(HttpReply::json(
                    200,
                    Value::Object(result.settings.unwrap_or_default()),
                ))
            }
            ("POST", "/settings") => {
                let doc: SettingsDocument = parse_body(body)?;
                let result = self.api.replace_settings(doc)?;
                Ok(HttpReply::json(200, success_reply(&result)))
            }
            ("PUT", "/settings") => {
                #[derive(serde::Deserialize)]
                struct SettingUpdate {
                    category: String,
                    key: String,
                    value: Value,
                }
                let update: SettingUpdate = parse_body(body)?;
                let result = self
                    .api
                    .set_setting(&update.category, &update.key, update.value)?;
                Ok(HttpReply::json(200, success_reply(&result)))
            }

            ("POST", "/pages") => {
                #[derive(serde::Deserialize)]
                struct PageUpdate {
                    page: String,
                    #[serde(default)]
                    html: String,
                }
                let update: PageUpdate = parse_body(body)?;
                let page: PageName = update.page.parse()?;
                let result = self.api.write_page(page, &update.html)?;
                let mut reply = json!({
                    "success": true,
                    "message": format!("{} updated successfully", page.file_name()),
                    "backup": result.backup_file.as_ref().map(|p| p.display().to_string()),
                });
                attach_warnings(&mut reply, &result);
                Ok(HttpReply::json(200, reply))
            }

            ("POST", "/rebuild") => {
                let result = self.api.trigger_rebuild()?;
                let note = result
                    .messages
                    .first()
                    .map(|m| m.content.clone())
                    .unwrap_or_default();
                Ok(HttpReply::json(
                    200,
                    json!({ "success": true, "message": note }),
                ))
            }

            ("GET", "/backup") => {
                let result = self.api.create_backup()?;
                let archive = result
                    .backup_file
                    .ok_or_else(|| SitepadError::Store("Backup produced no archive".into()))?;
                let bytes = fs::read(&archive).map_err(SitepadError::Io)?;
                // temp archive is only needed long enough to stream it out
                let _ = fs::remove_file(&archive);

                let filename = archive
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "backup.tar.gz".to_string());
                Ok(HttpReply {
                    status: 200,
                    content_type: "application/gzip".to_string(),
                    body: bytes,
                    extra_headers: vec![(
                        "Content-Disposition".to_string(),
                        format!("attachment; filename={}", filename),
                    )],
                })
            }

            // known routes with an unsupported method
            (_, "/portfolio" | "/content" | "/media" | "/settings" | "/pages" | "/rebuild"
            | "/backup") => Ok(HttpReply::error(405, "Method not allowed")),

            _ => Ok(HttpReply::error(404, "Not found")),
        }
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|_| SitepadError::Validation("Invalid JSON body".into()))
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

fn warnings_of(result: &OpResult) -> Vec<String> {
    result
        .messages
        .iter()
        .filter(|m| m.level == MessageLevel::Warning)
        .map(|m| m.content.clone())
        .collect()
}

fn success_reply(result: &OpResult) -> Value {
    let mut reply = json!({ "success": true });
    attach_warnings(&mut reply, result);
    reply
}

fn attach_warnings(reply: &mut Value, result: &OpResult) {
    let warnings = warnings_of(result);
    if !warnings.is_empty() {
        if let Some(obj) = reply.as_object_mut() {
            obj.insert("warnings".to_string(), json!(warnings));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SitePaths;
    use crate::render::PageRenderer;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    const AUTH: Option<&str> = Some("Bearer changeme");

    fn server() -> (TempDir, AdminServer<InMemoryStore>) {
        let dir = TempDir::new().unwrap();
        let renderer = PageRenderer::new(SitePaths::new(dir.path()));
        let api = SiteApi::new(InMemoryStore::new(), renderer);
        let server = AdminServer::new(api, &SitepadConfig::default());
        (dir, server)
    }

    fn body_json(reply: &HttpReply) -> Value {
        serde_json::from_slice(&reply.body).unwrap()
    }

    #[test]
    fn health_needs_no_credentials() {
        let (_dir, mut server) = server();
        let reply = server.handle("GET", "/health", None, "");
        assert_eq!(reply.status, 200);
        assert_eq!(body_json(&reply)["status"], "ok");
    }

    #[test]
    fn missing_token_is_unauthorized() {
        let (_dir, mut server) = server();
        let reply = server.handle("GET", "/portfolio", None, "");
        assert_eq!(reply.status, 401);
        assert_eq!(body_json(&reply)["error"], "Unauthorized");
    }

    #[test]
    fn wrong_token_is_unauthorized() {
        let (_dir, mut server) = server();
        let reply = server.handle("GET", "/portfolio", Some("Bearer nope"), "");
        assert_eq!(reply.status, 401);
    }

    #[test]
    fn unsupported_method_is_405() {
        let (_dir, mut server) = server();
        let reply = server.handle("PATCH", "/portfolio", AUTH, "{}");
        assert_eq!(reply.status, 405);
    }

    #[test]
    fn unknown_route_is_404() {
        let (_dir, mut server) = server();
        let reply = server.handle("GET", "/users", AUTH, "");
        assert_eq!(reply.status, 404);
    }

    #[test]
    fn api_prefix_is_accepted() {
        let (_dir, mut server) = server();
        let reply = server.handle("GET", "/api/portfolio", AUTH, "");
        assert_eq!(reply.status, 200);
    }

    #[test]
    fn portfolio_post_then_get() {
        let (_dir, mut server) = server();
        let reply = server.handle(
            "POST",
            "/portfolio",
            AUTH,
            r#"{"title":"Acme Rebrand","category":"branding","description":"A new identity."}"#,
        );
        assert_eq!(reply.status, 200);
        let posted = body_json(&reply);
        assert_eq!(posted["success"], true);
        assert_eq!(posted["project"]["title"], "Acme Rebrand");
        assert_eq!(posted["project"]["category"], "branding");
        assert!(posted["project"]["id"].is_i64());
        assert_eq!(posted["project"]["images"], json!([]));
        assert!(posted["project"]["dateAdded"].is_string());

        let listed = server.handle("GET", "/portfolio", AUTH, "");
        let doc = body_json(&listed);
        assert_eq!(doc["projects"].as_array().unwrap().len(), 1);
        assert_eq!(doc["projects"][0]["id"], posted["project"]["id"]);
    }

    #[test]
    fn portfolio_post_without_title_is_400() {
        let (_dir, mut server) = server();
        let reply = server.handle("POST", "/portfolio", AUTH, r#"{"description":"d"}"#);
        assert_eq!(reply.status, 400);
        assert!(body_json(&reply)["error"]
            .as_str()
            .unwrap()
            .contains("title"));
    }

    #[test]
    fn portfolio_put_unknown_id_is_404() {
        let (_dir, mut server) = server();
        let reply = server.handle("PUT", "/portfolio", AUTH, r#"{"id":1,"title":"X"}"#);
        assert_eq!(reply.status, 404);
    }

    #[test]
    fn portfolio_delete_is_idempotent_over_http() {
        let (_dir, mut server) = server();
        server.handle(
            "POST",
            "/portfolio",
            AUTH,
            r#"{"title":"T","description":"D"}"#,
        );
        let first = server.handle("DELETE", "/portfolio?id=1", AUTH, "");
        let second = server.handle("DELETE", "/portfolio?id=1", AUTH, "");
        assert_eq!(body_json(&first)["success"], true);
        assert_eq!(body_json(&second)["success"], true);
    }

    #[test]
    fn media_bulk_delete_reports_removed_count() {
        let (_dir, mut server) = server();
        server.handle(
            "POST",
            "/media",
            AUTH,
            r#"{"id":"img-1","url":"/assets/images/a.jpg"}"#,
        );
        let reply = server.handle(
            "PATCH",
            "/media",
            AUTH,
            r#"{"operation":"delete","items":["img-1","img-2"]}"#,
        );
        assert_eq!(reply.status, 200);
        let body = body_json(&reply);
        assert_eq!(body["removed"], 1);
        assert_eq!(body["message"], "Deleted 1 items");
    }

    #[test]
    fn media_patch_with_other_operation_is_400() {
        let (_dir, mut server) = server();
        let reply = server.handle(
            "PATCH",
            "/media",
            AUTH,
            r#"{"operation":"rename","items":["a"]}"#,
        );
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn settings_response_never_contains_the_passcode() {
        let (_dir, mut server) = server();
        let reply = server.handle("GET", "/settings", AUTH, "");
        assert_eq!(reply.status, 200);
        let text = String::from_utf8(reply.body).unwrap();
        assert!(!text.contains("changeme"));
        assert!(!text.contains("passcode"));
    }

    #[test]
    fn settings_replace_keeps_credentials_working() {
        let (_dir, mut server) = server();
        let reply = server.handle(
            "POST",
            "/settings",
            AUTH,
            r#"{"site":{"title":"New"},"admin":{"sessionTimeout":10}}"#,
        );
        assert_eq!(reply.status, 200);
        // passcode was preserved, so the old credential still verifies
        let listed = server.handle("GET", "/settings", AUTH, "");
        assert_eq!(listed.status, 200);
        assert_eq!(body_json(&listed)["site"]["title"], "New");
    }

    #[test]
    fn pages_post_rejects_unknown_page_names() {
        let (_dir, mut server) = server();
        let reply = server.handle(
            "POST",
            "/pages",
            AUTH,
            r#"{"page":"admin","html":"<html></html>"}"#,
        );
        assert_eq!(reply.status, 400);
    }

    #[test]
    fn pages_post_writes_and_reports_backup() {
        let (dir, mut server) = server();
        std::fs::write(dir.path().join("about.html"), "old").unwrap();
        let reply = server.handle(
            "POST",
            "/pages",
            AUTH,
            r#"{"page":"about","html":"<html>new</html>"}"#,
        );
        assert_eq!(reply.status, 200);
        let body = body_json(&reply);
        assert!(body["backup"].as_str().unwrap().contains("about-"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("about.html")).unwrap(),
            "<html>new</html>"
        );
    }

    #[test]
    fn rebuild_acknowledges() {
        let (_dir, mut server) = server();
        let reply = server.handle("POST", "/rebuild", AUTH, "");
        assert_eq!(reply.status, 200);
        assert!(body_json(&reply)["message"]
            .as_str()
            .unwrap()
            .contains("simulated"));
    }

    #[test]
    fn backup_download_cleans_up_the_archive() {
        let (dir, mut server) = server();
        let reply = server.handle("GET", "/backup", AUTH, "");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "application/gzip");
        assert_eq!(reply.body[0], 0x1f);
        assert!(reply
            .extra_headers
            .iter()
            .any(|(f, v)| f == "Content-Disposition" && v.contains("backup-")));

        // the temp archive is gone after streaming
        let backups = dir.path().join("backups");
        let leftover = std::fs::read_dir(backups)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tar.gz"))
            .count();
        assert_eq!(leftover, 0);
    }

    #[test]
    fn anchor_missing_still_persists_and_warns() {
        let (dir, mut server) = server();
        std::fs::write(dir.path().join("portfolio.html"), "<html>no grid</html>").unwrap();

        let reply = server.handle(
            "POST",
            "/portfolio",
            AUTH,
            r#"{"title":"T","description":"D"}"#,
        );
        assert_eq!(reply.status, 200);
        let body = body_json(&reply);
        assert_eq!(body["success"], true);
        assert!(body["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .any(|w| w.as_str().unwrap().contains("grid")));

        let listed = server.handle("GET", "/portfolio", AUTH, "");
        assert_eq!(body_json(&listed)["projects"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn services_section_update_regenerates_the_grid() {
        let (dir, mut server) = server();
        std::fs::write(
            dir.path().join("services.html"),
            r#"<div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6 md:gap-8 max-w-6xl mx-auto"><div>old</div></div>"#,
        )
        .unwrap();

        let reply = server.handle(
            "PUT",
            "/content",
            AUTH,
            r#"{"page":"services","section":"services","data":[{"icon":"★","title":"Branding","description":"Full identity"}]}"#,
        );
        assert_eq!(reply.status, 200);

        let html = std::fs::read_to_string(dir.path().join("services.html")).unwrap();
        assert!(html.contains("★"));
        assert!(html.contains("Branding"));
        assert!(html.contains("Full identity"));
        assert!(!html.contains("old"));
    }
}
