mod common;

use std::sync::atomic::Ordering;

use chrono::NaiveDate;

use bktutor_client::commands::attended::{AttendedPage, NOT_FOUND_TITLE};
use bktutor_client::commands::booking::{scheduled_label, tutor_label, SessionPage};
use bktutor_client::commands::downloads::DownloadTracker;
use bktutor_client::commands::profile::{AvatarUpload, ProfilePage, Tab};
use bktutor_client::events::{Notice, Step};
use bktutor_client::ApiClient;
use bktutor_shared::protocol::ProfileUpdate;
use bktutor_shared::types::SessionId;

use common::MockBackend;

fn api(backend: &MockBackend) -> ApiClient {
    ApiClient::with_base(&backend.base).unwrap()
}

#[tokio::test]
async fn test_session_page_load_and_candidates() {
    let backend = MockBackend::spawn().await;
    let mut page = SessionPage::new(api(&backend), "sess-1".into());
    assert_eq!(page.load().await, Step::Stay);

    let session = page.session().unwrap();
    assert_eq!(page.title().as_deref(), Some("CO2003 - Data Structures and Algorithms"));
    assert_eq!(scheduled_label(session), "01/12/26");
    assert_eq!(tutor_label(session), "Tutor: Le Thanh Van");

    let options = page.reschedule_options();
    assert_eq!(options.len(), 2);
    assert_eq!(options[1].id, Some(SessionId::from("sess-2")));
    assert!(options[1].label.ends_with("Tutor: TBD)"));
}

#[tokio::test]
async fn test_session_page_cancel() {
    let backend = MockBackend::spawn().await;
    let mut page = SessionPage::new(api(&backend), "sess-1".into());

    assert_eq!(page.cancel("schedule clash", "").await, Step::Stay);
    assert_eq!(page.cancel_notice(), Some(&Notice::info("Cancelled.")));

    assert_eq!(page.cancel("", "").await, Step::Stay);
    assert_eq!(page.cancel_notice(), Some(&Notice::error("Failed to cancel.")));
}

#[tokio::test]
async fn test_session_page_reschedule_switches_session() {
    let backend = MockBackend::spawn().await;
    let mut page = SessionPage::new(api(&backend), "sess-1".into());
    let _ = page.load().await;

    assert_eq!(page.reschedule("exam week", "", None).await, Step::Stay);
    assert_eq!(page.reschedule_notice(), Some(&Notice::info("Reschedule submitted.")));
    assert_eq!(page.session_id().as_str(), "sess-1");

    let target = SessionId::from("sess-2");
    assert_eq!(page.reschedule("exam week", "evening", Some(target)).await, Step::Stay);
    assert_eq!(
        page.reschedule_notice(),
        Some(&Notice::info("Rescheduled to a new session."))
    );
    assert_eq!(page.session_id().as_str(), "sess-2");
    assert_eq!(page.session().unwrap().day_of_week, "WED");
    assert_eq!(page.candidates()[0].id.as_str(), "sess-1");

    let bodies = backend.state.reschedules.lock().unwrap().clone();
    assert_eq!(bodies[0]["newSessionId"], "");
    assert_eq!(bodies[1]["newSessionId"], "sess-2");
}

#[tokio::test]
async fn test_session_page_unauthorized() {
    let backend = MockBackend::spawn().await;
    backend.expire_session();
    let mut page = SessionPage::new(api(&backend), "sess-1".into());
    assert_eq!(page.load().await, Step::to_login());
}

#[tokio::test]
async fn test_attended_page_uses_library_service() {
    let backend = MockBackend::spawn().await;
    let mut page = AttendedPage::new(api(&backend), "att-1", DownloadTracker::in_memory());
    assert_eq!(page.load().await, Step::Stay);

    assert_eq!(page.title(), "CO1005 - Introduction to Computing");
    assert_eq!(page.tutor_label(), "Tutor: Tran Hong Tai");
    assert_eq!(page.completed_label(), "12/03/2025");
    assert_eq!(page.progress_label(), "100%");
    assert_eq!(page.tags(), vec!["On campus", "MON", "13:00-15:00"]);

    let sections = page.sections();
    let syllabus = &sections[0].items;
    assert_eq!(syllabus.len(), 1);
    assert_eq!(syllabus[0].name, "CO1005 syllabus.pdf");
    // The library answered, so the session's embedded resources stay hidden.
    assert!(sections[3].items.is_empty());

    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    let link = page.download(&syllabus[0], today).unwrap();
    assert_eq!(link, format!("{}/library/resources/1/download", backend.base));
    assert_eq!(page.download(&sections[1].items[0], today), None);

    let logged = page.downloads().panel();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].label(), "CO1005 syllabus.pdf (220 KB)");
}

#[tokio::test]
async fn test_attended_page_not_found() {
    let backend = MockBackend::spawn().await;
    let mut page = AttendedPage::new(api(&backend), "att-404", DownloadTracker::disabled());
    assert_eq!(page.load().await, Step::Stay);
    assert_eq!(page.title(), NOT_FOUND_TITLE);
    assert!(page.sections().is_empty());
}

#[tokio::test]
async fn test_profile_page_load() {
    let backend = MockBackend::spawn().await;
    let mut page = ProfilePage::new(api(&backend), DownloadTracker::disabled());
    assert_eq!(page.load().await, Step::Stay);

    assert_eq!(page.name(), "Nguyen Van An");
    assert_eq!(page.student_id(), "2213001");
    assert_eq!(page.phone(), "-");
    assert_eq!(page.booked_count_label(), "1 total");
    assert_eq!(page.attended_count_label(), "2 total");

    page.set_attended_tab(Tab::All);
    assert_eq!(page.attended_visible()[1].id.as_deref(), Some("2"));

    let history = page.attendance_history();
    assert_eq!(history[0].date, "Dec 3");
    assert_eq!(history[0].text, "CO1005 - Introduction to Computing - On campus");

    let stats = page.stats();
    assert_eq!(stats.sessions_attended, 5);
    assert_eq!(stats.hours_studied, 12.5);
}

#[tokio::test]
async fn test_profile_update_with_avatar() {
    let backend = MockBackend::spawn().await;
    let mut page = ProfilePage::new(api(&backend), DownloadTracker::disabled());
    let _ = page.load().await;

    let form = ProfileUpdate {
        full_name: "  Nguyen Van Binh ".to_string(),
        major: "Computer Science".to_string(),
        ..page.edit_form()
    };
    let avatar = AvatarUpload {
        file_name: "me.png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    };
    assert_eq!(page.update(form, Some(avatar)).await, Step::Stay);

    assert_eq!(page.notice(), Some(&Notice::info("Profile updated.")));
    assert_eq!(backend.state.avatar_bytes.load(Ordering::SeqCst), 4);
    let updates = backend.state.profile_updates.lock().unwrap().clone();
    assert_eq!(updates[0]["fullName"], "Nguyen Van Binh");
    assert_eq!(page.name(), "Nguyen Van Binh");
}

#[tokio::test]
async fn test_profile_unreachable_redirects() {
    let mut page = ProfilePage::new(
        ApiClient::with_base("http://127.0.0.1:9").unwrap(),
        DownloadTracker::disabled(),
    );
    assert_eq!(page.load().await, Step::to_login());
}
