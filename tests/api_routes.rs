mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use common::{PDF, TestApp, get, request, upload_request};
use outreach::models::user::Role;
use serde_json::json;

#[tokio::test]
async fn contact_requires_name_email_and_message() {
    let app = TestApp::new();

    let response = app
        .send(request(
            Method::POST,
            "/api/contact",
            None,
            Some(json!({ "name": "Ada", "email": "", "subject": "Hello" })),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let error = response.body["error"].as_str().unwrap();
    assert!(error.contains("email"), "{error}");
    assert!(error.contains("message"), "{error}");
    assert!(!error.contains("name,"), "{error}");
    assert!(app.backend.rows("contact_messages").is_empty());
}

#[tokio::test]
async fn contact_messages_are_stored_and_listed_for_admins() {
    let app = TestApp::new();

    let response = app
        .send(request(
            Method::POST,
            "/api/contact",
            None,
            Some(json!({ "name": "Ada", "email": "ada@example.org", "message": "Hi there" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["message"].is_string());
    assert_eq!(app.backend.rows("contact_messages").len(), 1);

    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));
    let response = app.send(get("/api/admin/contact", Some(&admin))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["messages"][0]["name"], "Ada");
}

#[tokio::test]
async fn contact_form_is_rate_limited_per_client() {
    let app = TestApp::new();
    let body = json!({ "name": "Ada", "email": "ada@example.org", "message": "Hi" });

    let mut statuses = Vec::new();
    for _ in 0..6 {
        let response = app
            .send(request(Method::POST, "/api/contact", None, Some(body.clone())))
            .await;
        statuses.push(response.status);
    }

    assert!(statuses[..5].iter().all(|s| *s == StatusCode::OK), "{statuses:?}");
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn event_mutations_need_a_privileged_caller() {
    let app = TestApp::new();
    let body = json!({ "title": "Gala", "date": "2026-11-01", "chapter": "US" });

    let response = app
        .send(request(Method::POST, "/api/events", None, Some(body.clone())))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let (_, member) = app.sign_in_as("member@example.org", Some(Role::User));
    let response = app
        .send(request(Method::POST, "/api/events", Some(&member), Some(body)))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(app.backend.rows("events").is_empty());
}

#[tokio::test]
async fn events_reject_unknown_chapters() {
    let app = TestApp::new();
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));

    let response = app
        .send(request(
            Method::POST,
            "/api/events",
            Some(&admin),
            Some(json!({ "title": "Gala", "date": "2026-11-01", "chapter": "Canada" })),
        ))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("Canada"));

    let response = app.send(get("/api/events?chapter=Canada", None)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn created_events_read_back_with_their_fields() {
    let app = TestApp::new();
    let (_, admin) = app.sign_in_as("super@example.org", Some(Role::SuperAdmin));

    let response = app
        .send(request(
            Method::POST,
            "/api/events",
            Some(&admin),
            Some(json!({
                "title": "Relief drive",
                "date": "2026-12-05",
                "time": "10:00",
                "location": "Dhaka",
                "chapter": "Bangladesh",
                "featured": true
            })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["event"]["id"].as_str().unwrap().to_string();

    let response = app.send(get(&format!("/api/events/{id}"), None)).await;
    assert_eq!(response.status, StatusCode::OK);
    let event = &response.body["event"];
    assert_eq!(event["title"], "Relief drive");
    assert_eq!(event["date"], "2026-12-05");
    assert_eq!(event["time"], "10:00");
    assert_eq!(event["location"], "Dhaka");
    assert_eq!(event["chapter"], "Bangladesh");
    assert_eq!(event["featured"], true);

    let response = app
        .send(get("/api/events?chapter=Bangladesh&featured=true&limit=5", None))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["events"].as_array().unwrap().len(), 1);

    let response = app.send(get("/api/events?chapter=US", None)).await;
    assert!(response.body["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_events_are_not_found() {
    let app = TestApp::new();

    let response = app
        .send(get("/api/events/8f14e45f-ceea-4e7a-9f4b-5b4c0e1f2a3b", None))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn stale_updates_conflict() {
    let app = TestApp::new();
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));

    let created = app
        .send(request(
            Method::POST,
            "/api/events",
            Some(&admin),
            Some(json!({ "title": "Gala", "date": "2026-11-01", "chapter": "US" })),
        ))
        .await;
    let id = created.body["event"]["id"].as_str().unwrap().to_string();
    let updated_at = created.body["event"]["updated_at"].clone();

    let response = app
        .send(request(
            Method::PUT,
            &format!("/api/events/{id}"),
            Some(&admin),
            Some(json!({ "title": "Winter gala", "expected_updated_at": "2000-01-01T00:00:00Z" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = app
        .send(request(
            Method::PUT,
            &format!("/api/events/{id}"),
            Some(&admin),
            Some(json!({ "title": "Winter gala", "expected_updated_at": updated_at })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["event"]["title"], "Winter gala");
    assert_eq!(response.body["event"]["chapter"], "US");
}

#[tokio::test]
async fn deleting_events_twice_reports_not_found() {
    let app = TestApp::new();
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));
    let row = app.backend.seed(
        "events",
        json!({ "title": "Old", "date": "2020-01-01", "chapter": "US", "featured": false }),
    );
    let uri = format!("/api/events/{}", row["id"].as_str().unwrap());

    let response = app.send(request(Method::DELETE, &uri, Some(&admin), None)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.send(request(Method::DELETE, &uri, Some(&admin), None)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn approving_twice_keeps_the_first_publication() {
    let app = TestApp::new();
    let (author, _) = app.sign_in_as("writer@example.org", Some(Role::User));
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));
    let blog = app.backend.seed(
        "blogs",
        json!({
            "title": "Field notes",
            "content": { "blocks": [] },
            "author_id": author.id,
            "status": "pending",
            "rejection_reason": "Needs sources"
        }),
    );
    let blog_id = blog["id"].clone();

    let approve = json!({ "blogId": blog_id, "status": "approved" });
    let first = app
        .send(request(Method::POST, "/api/admin/blogs/approve", Some(&admin), Some(approve.clone())))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    let published_at = first.body["blog"]["published_at"].clone();
    assert!(published_at.is_string());

    let second = app
        .send(request(Method::POST, "/api/admin/blogs/approve", Some(&admin), Some(approve)))
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["blog"]["status"], "approved");
    assert_eq!(second.body["blog"]["published_at"], published_at);
    assert_eq!(second.body["blog"]["rejection_reason"], "Needs sources");
}

#[tokio::test]
async fn review_requests_are_validated() {
    let app = TestApp::new();
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));

    let response = app
        .send(request(
            Method::POST,
            "/api/admin/blogs/approve",
            Some(&admin),
            Some(json!({ "status": "approved" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send(request(
            Method::POST,
            "/api/admin/blogs/approve",
            Some(&admin),
            Some(json!({ "blogId": "8f14e45f-ceea-4e7a-9f4b-5b4c0e1f2a3b", "status": "published" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send(request(
            Method::POST,
            "/api/admin/blogs/approve",
            Some(&admin),
            Some(json!({ "blogId": "8f14e45f-ceea-4e7a-9f4b-5b4c0e1f2a3b", "status": "rejected" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unpublished_posts_are_only_visible_to_author_and_admins() {
    let app = TestApp::new();
    let (_, author) = app.sign_in_as("writer@example.org", Some(Role::User));
    let (_, stranger) = app.sign_in_as("reader@example.org", Some(Role::User));
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));

    let created = app
        .send(request(
            Method::POST,
            "/api/blogs",
            Some(&author),
            Some(json!({ "title": "Draft thoughts", "content": { "blocks": [] } })),
        ))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["blog"]["status"], "pending");
    assert_eq!(created.body["blog"]["author_name"], "writer@example.org name");
    let uri = format!("/api/blogs/{}", created.body["blog"]["id"].as_str().unwrap());

    assert_eq!(app.send(get(&uri, None)).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.send(get(&uri, Some(&stranger))).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.send(get(&uri, Some(&author))).await.status, StatusCode::OK);
    assert_eq!(app.send(get(&uri, Some(&admin))).await.status, StatusCode::OK);

    let listed = app.send(get("/api/blogs", None)).await;
    assert!(listed.body["blogs"].as_array().unwrap().is_empty());

    let queue = app.send(get("/api/admin/blogs?status=pending", Some(&admin))).await;
    assert_eq!(queue.body["blogs"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blog_submission_requires_title_and_content() {
    let app = TestApp::new();
    let (_, author) = app.sign_in_as("writer@example.org", Some(Role::User));

    let response = app
        .send(request(Method::POST, "/api/blogs", Some(&author), Some(json!({ "excerpt": "x" }))))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let error = response.body["error"].as_str().unwrap();
    assert!(error.contains("title") && error.contains("content"), "{error}");
}

#[tokio::test]
async fn author_edits_send_reviewed_posts_back_to_review() {
    let app = TestApp::new();
    let (author, author_cookie) = app.sign_in_as("writer@example.org", Some(Role::User));
    let (_, stranger) = app.sign_in_as("reader@example.org", Some(Role::User));
    let blog = app.backend.seed(
        "blogs",
        json!({
            "title": "Published",
            "content": { "blocks": [] },
            "author_id": author.id,
            "status": "approved",
            "published_at": "2026-01-01T00:00:00Z"
        }),
    );
    let uri = format!("/api/blogs/{}", blog["id"].as_str().unwrap());

    let response = app
        .send(request(Method::PUT, &uri, Some(&stranger), Some(json!({ "title": "Mine now" }))))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .send(request(Method::PUT, &uri, Some(&author_cookie), Some(json!({ "title": "Revised" }))))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["blog"]["title"], "Revised");
    assert_eq!(response.body["blog"]["status"], "pending");

    let response = app.send(request(Method::DELETE, &uri, Some(&author_cookie), None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(app.backend.rows("blogs").is_empty());
}

#[tokio::test]
async fn research_pdfs_upload_but_only_with_a_document_type() {
    let app = TestApp::new();
    let (_, member) = app.sign_in_as("member@example.org", Some(Role::User));

    let response = app
        .send(upload_request(&member, Some("resources"), "guide.pdf", "application/pdf", PDF))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let url = response.body["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/resources/"), "{url}");
    assert!(url.ends_with(".pdf"), "{url}");
    assert_eq!(
        response.body["absolute_url"],
        format!("https://outreach.test{url}")
    );
    let name = url.rsplit('/').next().unwrap();
    assert!(app.upload_dir().join("resources").join(name).exists());

    let response = app
        .send(upload_request(&member, None, "guide.pdf", "application/pdf", PDF))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn uploads_need_a_session_and_a_known_type() {
    let app = TestApp::new();
    let (_, member) = app.sign_in_as("member@example.org", Some(Role::User));

    let response = app
        .send(upload_request("outreach_session=missing", Some("research"), "a.pdf", "application/pdf", PDF))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .send(upload_request(&member, Some("avatars"), "a.pdf", "application/pdf", PDF))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send(upload_request(&member, Some("research"), "a.png", "image/png", PDF))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn resources_and_research_round_trip() {
    let app = TestApp::new();
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));

    let response = app
        .send(request(
            Method::POST,
            "/api/resources",
            Some(&admin),
            Some(json!({ "description": "no title" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .send(request(
            Method::POST,
            "/api/resources",
            Some(&admin),
            Some(json!({ "title": "Toolkit", "category": "guides", "link_url": "https://example.org" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let listed = app.send(get("/api/resources?category=guides", None)).await;
    assert_eq!(listed.body["resources"][0]["title"], "Toolkit");

    let response = app
        .send(request(
            Method::POST,
            "/api/research",
            Some(&admin),
            Some(json!({ "title": "Flood resilience" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].as_str().unwrap().contains("authors"));

    let response = app
        .send(request(
            Method::POST,
            "/api/research",
            Some(&admin),
            Some(json!({ "title": "Flood resilience", "authors": "R. Khan", "abstract": "Findings" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["publication"]["id"].as_str().unwrap().to_string();

    let response = app.send(get(&format!("/api/research/{id}"), None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["publication"]["abstract"], "Findings");
    assert_eq!(response.body["publication"]["authors"], "R. Khan");
}

#[tokio::test]
async fn promotion_answers_with_json_and_registers_the_admin() {
    let app = TestApp::new();
    let (member, member_cookie) = app.sign_in_as("member@example.org", Some(Role::User));
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));
    let profile_row = |app: &TestApp| {
        app.backend
            .rows("profiles")
            .into_iter()
            .find(|row| row["id"] == member.id.to_string())
            .unwrap()
    };
    let before = profile_row(&app);

    let response = app
        .send(request(
            Method::POST,
            &format!("/api/users/{}/promote", member.id),
            Some(&admin),
            None,
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["role"], "admin");

    let after = profile_row(&app);
    let columns = |row: &serde_json::Value| {
        row.as_object().unwrap().keys().cloned().collect::<Vec<_>>()
    };
    assert_eq!(columns(&after), columns(&before));
    assert_eq!(after["role"], "admin");
    assert!(
        app.backend
            .rows("admins")
            .iter()
            .any(|row| row["id"] == member.id.to_string())
    );

    let response = app.send(get("/dashboard/admin", Some(&member_cookie))).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .send(request(
            Method::POST,
            "/api/users/8f14e45f-ceea-4e7a-9f4b-5b4c0e1f2a3b/promote",
            Some(&admin),
            None,
        ))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn login_session_and_logout() {
    let app = TestApp::new();
    app.backend
        .add_user("member@example.org", "correct horse", Some(Role::User), false);

    let response = app
        .send(request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "member@example.org", "password": "wrong" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .send(request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "member@example.org", "password": "correct horse" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["user"]["email"], "member@example.org");
    let cookie = format!("outreach_session={}", response.session_cookie().unwrap());

    let response = app.send(get("/api/auth/session", Some(&cookie))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["role"], "user");

    let response = app
        .send(request(Method::POST, "/api/auth/logout", Some(&cookie), None))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.session_cookie().as_deref(), Some(""));

    let response = app.send(get("/api/auth/session", Some(&cookie))).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_creates_a_user_profile() {
    let app = TestApp::new();

    let response = app
        .send(request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "new@example.org", "password": "longenough", "full_name": "New Member" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let profiles = app.backend.rows("profiles");
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["role"], "user");
    assert_eq!(profiles[0]["full_name"], "New Member");

    let response = app
        .send(request(
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "new@example.org", "password": "longenough" })),
        ))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn settings_default_then_upsert() {
    let app = TestApp::new();
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));

    let response = app.send(get("/api/settings", None)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["settings"]["id"].is_null());

    for name in ["Outreach", "Outreach Global"] {
        let response = app
            .send(request(
                Method::PUT,
                "/api/admin/settings",
                Some(&admin),
                Some(json!({ "site_name": name, "social_links": { "x": "https://x.com/outreach" } })),
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    assert_eq!(app.backend.rows("site_settings").len(), 1);
    let response = app.send(get("/api/settings", None)).await;
    assert_eq!(response.body["settings"]["site_name"], "Outreach Global");
    assert_eq!(response.body["settings"]["social_links"]["x"], "https://x.com/outreach");
}

#[tokio::test]
async fn admin_overview_counts_every_collection() {
    let app = TestApp::new();
    let (author, _) = app.sign_in_as("writer@example.org", Some(Role::User));
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));
    app.backend.seed(
        "events",
        json!({ "title": "Gala", "date": "2026-11-01", "chapter": "US" }),
    );
    for status in ["pending", "pending", "approved"] {
        app.backend.seed(
            "blogs",
            json!({ "title": "Post", "content": {}, "author_id": author.id, "status": status }),
        );
    }

    let response = app.send(get("/api/admin/stats", Some(&admin))).await;
    assert_eq!(response.status, StatusCode::OK);
    let stats = &response.body["stats"];
    assert_eq!(stats["events"], 1);
    assert_eq!(stats["pending_blogs"], 2);
    assert_eq!(stats["published_blogs"], 1);
    assert_eq!(stats["users"], 2);
    assert_eq!(stats["contact_messages"], 0);

    let response = app.send(get("/api/admin/users", Some(&admin))).await;
    assert_eq!(response.body["users"].as_array().unwrap().len(), 2);
}

fn raw_post(uri: &str, content_type: Option<&str>, body: &'static str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("x-forwarded-for", "203.0.113.7");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn unreadable_bodies_answer_with_a_json_error() {
    let app = TestApp::new();

    let requests = [
        request(
            Method::POST,
            "/api/contact",
            None,
            Some(json!({ "name": 5, "email": "ada@example.org", "message": "Hi" })),
        ),
        raw_post("/api/contact", None, r#"{"name":"Ada","email":"ada@example.org","message":"Hi"}"#),
        raw_post("/api/contact", Some("application/json"), "{not json"),
        raw_post("/api/auth/login", Some("application/json"), r#""ada@example.org""#),
    ];

    for request in requests {
        let response = app.send(request).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body["error"].is_string(), "{:?}", response.body);
    }
    assert!(app.backend.rows("contact_messages").is_empty());
}

#[tokio::test]
async fn malformed_ids_answer_with_a_json_error() {
    let app = TestApp::new();
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));

    let response = app.send(get("/api/events/not-a-uuid", None)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());

    let response = app
        .send(request(Method::DELETE, "/api/research/42", Some(&admin), None))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn uploads_without_a_multipart_body_answer_with_a_json_error() {
    let app = TestApp::new();
    let (_, cookie) = app.sign_in_as("member@example.org", Some(Role::User));

    let response = app
        .send(request(Method::POST, "/api/upload", Some(&cookie), Some(json!({ "file": "x" }))))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["error"].is_string());
}

#[tokio::test]
async fn failed_role_lookups_surface_as_server_errors() {
    let app = TestApp::new();
    let (_, admin) = app.sign_in_as("admin@example.org", Some(Role::Admin));
    app.backend.fail_tables(true);

    let response = app.send(get("/api/admin/stats", Some(&admin))).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Internal server error");
}
