// Integration tests for libmanager: drive AppState through key presses
// against a scripted in-memory backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use serde_json::{Value, json};

use libmanager::api::{Book, LibraryApi, RentRequest, User, accept_response};
use libmanager::app::keymap::Keymap;
use libmanager::app::update::handle_key;
use libmanager::app::{AppState, InputMode, Page, PageData, Theme};
use libmanager::error::ApiError;
use libmanager::notify::ToastStatus;

enum RentReply {
    Created(Value),
    Rejected(u16, Value),
    /// Raw status and body as the HTTP client would see them.
    Raw(u16, &'static str),
    /// The worker dies before answering.
    Crash,
}

struct FakeApi {
    users: Vec<User>,
    books: Vec<Book>,
    reply: RentReply,
    calls: AtomicUsize,
    rents: Mutex<Vec<RentRequest>>,
}

impl FakeApi {
    fn new(reply: RentReply) -> Self {
        Self {
            users: vec![
                User { id: "7".into(), name: "Helena".into() },
                User { id: "3".into(), name: "Otávio".into() },
            ],
            books: vec![
                Book {
                    id: "42".into(),
                    title: "Dune".into(),
                    author: "Frank Herbert".into(),
                    isbn: "9780441013593".into(),
                },
                Book {
                    id: "9".into(),
                    title: "Neuromancer".into(),
                    author: "William Gibson".into(),
                    isbn: "9780441569595".into(),
                },
            ],
            reply,
            calls: AtomicUsize::new(0),
            rents: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LibraryApi for FakeApi {
    fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.clone())
    }

    fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.books.clone())
    }

    fn create_rent(&self, req: &RentRequest) -> Result<Value, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rents.lock().unwrap().push(req.clone());
        match &self.reply {
            RentReply::Created(body) => Ok(body.clone()),
            RentReply::Rejected(status, body) => Err(ApiError::Status {
                url: "http://fake/rents/create".into(),
                status: *status,
                body: Some(body.clone()),
            }),
            RentReply::Raw(status, text) => {
                accept_response("http://fake/rents/create", *status, text)
            }
            RentReply::Crash => panic!("backend worker crashed"),
        }
    }
}

fn mk_app(api: &Arc<FakeApi>) -> AppState {
    let data = PageData {
        users: api.users.clone(),
        books: api.books.clone(),
    };
    let shared: Arc<dyn LibraryApi> = api.clone();
    AppState::new(shared, data, Theme::mocha(), Keymap::default())
}

fn press(app: &mut AppState, code: KeyCode) -> bool {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(app: &mut AppState, c: char) -> bool {
    handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

/// Fill the rent form through the keyboard: first user, first book, two dates.
fn fill_rent_form(app: &mut AppState) {
    press(app, KeyCode::Down);
    press(app, KeyCode::Tab);
    press(app, KeyCode::Down);
    press(app, KeyCode::Tab);
    type_text(app, "2024-02-01");
    press(app, KeyCode::Tab);
    type_text(app, "2024-02-15");
}

fn wait_for_submission(app: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while app.rent.is_submitting() {
        assert!(Instant::now() < deadline, "submission did not finish");
        app.rent.poll_submission(&mut app.toasts);
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn render_to_text(app: &mut AppState) -> String {
    let mut terminal = Terminal::new(TestBackend::new(110, 32)).unwrap();
    terminal
        .draw(|f| libmanager::ui::render(f, app))
        .unwrap();
    let buf = terminal.backend().buffer();
    let width = buf.area.width as usize;
    let mut out = String::new();
    for (i, cell) in buf.content().iter().enumerate() {
        out.push_str(cell.symbol());
        if (i + 1) % width == 0 {
            out.push('\n');
        }
    }
    out
}

// 1) Successful rental shows one success toast and keeps the form
#[test]
fn successful_rent_shows_one_success_toast() {
    let api = Arc::new(FakeApi::new(RentReply::Created(json!({ "id": "r1" }))));
    let mut app = mk_app(&api);

    fill_rent_form(&mut app);
    assert!(app.rent.submit_enabled());
    assert!(ctrl(&mut app, 's'));
    wait_for_submission(&mut app);

    assert_eq!(app.toasts.len(), 1);
    let toast = app.toasts.current().unwrap();
    assert_eq!(toast.status, ToastStatus::Success);
    assert_eq!(toast.message, "Book rented successfully!");

    let sent = api.rents.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].user_id, "7");
    assert_eq!(sent[0].book_id, "42");
    assert_eq!(sent[0].initial_date.to_string(), "2024-02-01");
    assert_eq!(sent[0].final_date.to_string(), "2024-02-15");

    // Neither cleared nor navigated away.
    assert_eq!(app.active_page, Page::Rent);
    assert_eq!(app.rent.form.selected_user(), Some("7"));
    assert!(app.rent.submit_enabled());
}

// 2) Rejected rental shows the server's message once, form stays usable
#[test]
fn rejected_rent_shows_server_message() {
    let api = Arc::new(FakeApi::new(RentReply::Rejected(
        400,
        json!({ "message": "Book unavailable" }),
    )));
    let mut app = mk_app(&api);

    fill_rent_form(&mut app);
    // Enter on the submit button.
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Enter);
    wait_for_submission(&mut app);

    assert_eq!(app.toasts.len(), 1);
    let toast = app.toasts.current().unwrap();
    assert_eq!(toast.status, ToastStatus::Error);
    assert_eq!(toast.message, "Book unavailable");
    assert!(app.rent.submit_enabled());
}

#[test]
fn plain_text_created_body_is_a_success() {
    let api = Arc::new(FakeApi::new(RentReply::Raw(201, "Created")));
    let mut app = mk_app(&api);

    fill_rent_form(&mut app);
    assert!(ctrl(&mut app, 's'));
    wait_for_submission(&mut app);

    assert_eq!(app.toasts.len(), 1);
    let toast = app.toasts.current().unwrap();
    assert_eq!(toast.status, ToastStatus::Success);
    assert_eq!(toast.message, "Book rented successfully!");
    assert_eq!(api.calls(), 1);
}

#[test]
fn failure_without_body_shows_generic_error() {
    let api = Arc::new(FakeApi::new(RentReply::Raw(500, "")));
    let mut app = mk_app(&api);

    fill_rent_form(&mut app);
    assert!(ctrl(&mut app, 's'));
    wait_for_submission(&mut app);

    assert_eq!(app.toasts.len(), 1);
    let toast = app.toasts.current().unwrap();
    assert_eq!(toast.status, ToastStatus::Error);
    assert!(!toast.message.is_empty());
    assert!(toast.message.contains("500"));
    assert!(app.rent.submit_enabled());
}

#[test]
fn crashed_worker_reports_interrupted_request() {
    let api = Arc::new(FakeApi::new(RentReply::Crash));
    let mut app = mk_app(&api);

    fill_rent_form(&mut app);
    assert!(ctrl(&mut app, 's'));
    wait_for_submission(&mut app);

    assert_eq!(app.toasts.len(), 1);
    let toast = app.toasts.current().unwrap();
    assert_eq!(toast.status, ToastStatus::Error);
    assert_eq!(toast.message, "The rental request was interrupted");
    assert!(app.rent.submit_enabled());
}

// 3) Incomplete form sends nothing
#[test]
fn incomplete_form_does_not_submit() {
    let api = Arc::new(FakeApi::new(RentReply::Created(Value::Null)));
    let mut app = mk_app(&api);

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "2024-02-01");
    ctrl(&mut app, 's');

    assert!(!app.rent.is_submitting());
    assert_eq!(api.calls(), 0);
    assert!(app.toasts.is_empty());
}

// 4) Create-user page is static and never touches the backend
#[test]
fn create_user_page_renders_heading_without_network() {
    let api = Arc::new(FakeApi::new(RentReply::Created(Value::Null)));
    let mut app = mk_app(&api).with_page(Page::CreateUser);

    let text = render_to_text(&mut app);
    assert!(text.contains("Register new user"));
    assert!(text.contains("LibManager | Create user"));

    // Typing on the page has no effect and makes no calls.
    type_text(&mut app, "2024");
    press(&mut app, KeyCode::Enter);
    ctrl(&mut app, 's');
    let _ = render_to_text(&mut app);
    assert_eq!(api.calls(), 0);
    assert!(!app.rent.is_submitting());
}

// 5) Rent page renders the select options and the placeholder
#[test]
fn rent_page_renders_options_in_order() {
    let api = Arc::new(FakeApi::new(RentReply::Created(Value::Null)));
    let mut app = mk_app(&api);
    let text = render_to_text(&mut app);

    assert!(text.contains("Rent books"));
    assert!(text.contains("Select a user"));
    assert!(text.contains("Select a book"));
    let helena = text.find("Helena").expect("first user shown");
    let otavio = text.find("Otávio").expect("second user shown");
    assert!(helena < otavio);
    assert!(text.contains("RENT"));
}

// 6) Page navigation and books search
#[test]
fn books_page_search_filters_and_restores() {
    let api = Arc::new(FakeApi::new(RentReply::Created(Value::Null)));
    let mut app = mk_app(&api);

    press(&mut app, KeyCode::Char(']'));
    assert_eq!(app.active_page, Page::Books);

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.input_mode, InputMode::SearchBooks);
    type_text(&mut app, "gibson");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.books.len(), 1);
    assert_eq!(app.books[0].title, "Neuromancer");

    let text = render_to_text(&mut app);
    assert!(text.contains("Neuromancer"));
    assert!(!text.contains("Frank Herbert"));

    press(&mut app, KeyCode::Char('/'));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.books.len(), 2);

    press(&mut app, KeyCode::Char('['));
    assert_eq!(app.active_page, Page::Rent);
}

// 7) Help, toast dismissal and quit
#[test]
fn help_toast_and_quit_keys() {
    let api = Arc::new(FakeApi::new(RentReply::Created(Value::Null)));
    let mut app = mk_app(&api);

    press(&mut app, KeyCode::Char('?'));
    assert_eq!(app.input_mode, InputMode::Help);
    let text = render_to_text(&mut app);
    assert!(text.contains("Ctrl+s"));
    // 'q' closes help rather than quitting.
    assert!(press(&mut app, KeyCode::Char('q')));
    assert_eq!(app.input_mode, InputMode::Normal);

    app.toasts.error("Book unavailable");
    let text = render_to_text(&mut app);
    assert!(text.contains("Book unavailable"));
    press(&mut app, KeyCode::Esc);
    assert!(app.toasts.is_empty());

    assert!(!press(&mut app, KeyCode::Char('q')));
    assert!(!ctrl(&mut app, 'c'));
}

// 8) Page data is fetched users first, then books
#[test]
fn page_data_load_fetches_both_lists() {
    let api = FakeApi::new(RentReply::Created(Value::Null));
    let data = PageData::load(&api).expect("load");
    assert_eq!(api.calls(), 2);
    assert_eq!(data.users.len(), 2);
    assert_eq!(data.books[1].id, "9");
}

#[test]
fn page_data_load_failure_names_the_list() {
    struct Down;
    impl LibraryApi for Down {
        fn list_users(&self) -> Result<Vec<User>, ApiError> {
            Err(ApiError::Status {
                url: "http://fake/users".into(),
                status: 503,
                body: None,
            })
        }
        fn list_books(&self) -> Result<Vec<Book>, ApiError> {
            Ok(vec![])
        }
        fn create_rent(&self, _req: &RentRequest) -> Result<Value, ApiError> {
            Ok(Value::Null)
        }
    }
    let err = PageData::load(&Down).unwrap_err();
    assert!(err.to_string().starts_with("load users: "));
}

fn temp_path(stem: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("libmanager_{stem}_{}_{}.conf", std::process::id(), nonce));
    path.to_string_lossy().to_string()
}

// 9) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    let path = temp_path("theme");
    let t = Theme::mocha();
    t.write_file(&path).expect("write theme");
    let t2 = Theme::from_file(&path).expect("read theme");
    assert_eq!(t.text, t2.text);
    assert_eq!(t.success, t2.success);
    assert_eq!(t.header_bg, t2.header_bg);

    let init = temp_path("theme_init");
    let _ = std::fs::remove_file(&init);
    let _created = Theme::load_or_init(&init);
    assert!(std::path::Path::new(&init).exists());

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&init);
}

// 10) Keybindings file overrides defaults
#[test]
fn keymap_file_adds_bindings() {
    let path = temp_path("keys");
    std::fs::write(&path, "# custom\nSubmit = Ctrl+r, F\nNextPage = Right\nBogus = x\n").unwrap();
    let km = Keymap::from_file(&path).expect("read keymap");
    use libmanager::app::keymap::KeyAction;
    assert_eq!(
        km.resolve(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)),
        Some(KeyAction::Submit)
    );
    assert_eq!(
        km.resolve(&KeyEvent::new(KeyCode::Char('F'), KeyModifiers::NONE)),
        Some(KeyAction::Submit)
    );
    assert_eq!(
        km.resolve(&KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)),
        Some(KeyAction::NextPage)
    );
    // Defaults survive.
    assert_eq!(
        km.resolve(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)),
        Some(KeyAction::Submit)
    );

    // Written file loads back to an equivalent map.
    let out = temp_path("keys_out");
    km.write_file(&out).unwrap();
    let km2 = Keymap::from_file(&out).unwrap();
    assert_eq!(km2.keys_for(KeyAction::Submit), km.keys_for(KeyAction::Submit));

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&out);
}
