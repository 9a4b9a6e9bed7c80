use seo_audit::audit::run_audit;
use seo_audit::config::Effective;
use seo_audit::error::AuditError;
use seo_audit::models::{Category, Issue, Mode, Severity};
use seo_audit::report::{render_markdown, write_report, ReportMeta};
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, body: &str) {
    let p = root.join(rel);
    fs::create_dir_all(p.parent().unwrap()).unwrap();
    fs::write(p, body).unwrap();
}

fn site(root: &Path) {
    write(
        root,
        "app/page.tsx",
        r#"export const metadata = { title: "Home", description: "Short" };
export default function Home() {
  return <main><h1>Welcome</h1><a href="/about">About</a><a href="/gone">Gone</a></main>;
}"#,
    );
    write(
        root,
        "app/about/page.tsx",
        r#"export default function About() { return <section><h1>About</h1><h1>Team</h1></section>; }"#,
    );
    write(root, "public/robots.txt", "User-agent: *\nDisallow: /\nDisallow: /admin\n");
}

fn noop(_: &str) {}

#[test]
fn static_runs_produce_identical_reports() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    site(root);
    let eff = Effective::for_root(root);
    let meta = ReportMeta {
        generated_at: None,
        project: "fixture".into(),
        base_url: None,
    };

    let first = run_audit(&eff, &mut noop).unwrap();
    write_report(&eff.report_path, &render_markdown(&first, &meta)).unwrap();
    let a = fs::read(&eff.report_path).unwrap();

    let second = run_audit(&eff, &mut noop).unwrap();
    write_report(&eff.report_path, &render_markdown(&second, &meta)).unwrap();
    let b = fs::read(&eff.report_path).unwrap();

    assert_eq!(a, b);
    assert_eq!(first.issues, second.issues);
}

#[test]
fn robots_disallow_all_is_one_high_issue() {
    let dir = tempdir().unwrap();
    site(dir.path());
    let out = run_audit(&Effective::for_root(dir.path()), &mut noop).unwrap();
    let blocked: Vec<&Issue> = out
        .issues
        .iter()
        .filter(|i| i.message.contains("blocks all crawlers"))
        .collect();
    assert_eq!(blocked.len(), 1);
    assert_eq!(blocked[0].severity, Severity::High);
}

#[test]
fn double_h1_without_hero_is_one_medium() {
    let dir = tempdir().unwrap();
    site(dir.path());
    let out = run_audit(&Effective::for_root(dir.path()), &mut noop).unwrap();
    let about: Vec<&Issue> = out
        .issues
        .iter()
        .filter(|i| i.file == "app/about/page.tsx" && i.category == Category::Structure)
        .collect();
    assert_eq!(about.len(), 1);
    assert_eq!(about[0].severity, Severity::Medium);
    assert!(about[0].message.starts_with("Multiple H1"));
    assert!(out
        .issues
        .iter()
        .any(|i| i.category == Category::BrokenLinks && i.message.contains("/gone")));
}

/// Serve `/` with a page and everything else with 404 until the test exits.
fn fixture_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            loop {
                let mut header = String::new();
                match reader.read_line(&mut header) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if header == "\r\n" || header == "\n" => break,
                    Ok(_) => {}
                }
            }
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or("GET");
            let path = parts.next().unwrap_or("/");
            let (status, body) = if path == "/" {
                (
                    "200 OK",
                    "<html><body><h1>Welcome</h1><p>Plain words about the clinic.</p></body></html>",
                )
            } else {
                ("404 Not Found", "")
            };
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                if method == "HEAD" { "" } else { body }
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });
    format!("http://{}", addr)
}

#[test]
fn live_404_is_one_high_status_issue() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "app/page.tsx", r#"<main><h1>Welcome</h1><a href="/missing">m</a></main>"#);
    write(root, "app/missing/page.tsx", "<main><h1>Missing</h1></main>");
    let mut eff = Effective::for_root(root);
    eff.live.enabled = true;
    eff.live.check_external = false;
    eff.live.base_url = fixture_server();

    let out = run_audit(&eff, &mut noop).unwrap();
    assert_eq!(out.mode, Mode::Live);
    let missing: Vec<&Issue> = out
        .issues
        .iter()
        .filter(|i| i.file == "app/missing/page.tsx" && i.category == Category::Crawlability)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].severity, Severity::High);
    assert!(missing[0].message.contains("404"));
    assert!(!out
        .issues
        .iter()
        .any(|i| i.file == "app/missing/page.tsx" && i.message.ends_with("(rendered)")));
    let stats = out.crawl.unwrap();
    assert_eq!(stats.pages_crawled, 1);
    assert_eq!(stats.external_links_checked, 0);
}

fn closed_port() -> u16 {
    let l = TcpListener::bind("127.0.0.1:0").unwrap();
    l.local_addr().unwrap().port()
}

#[test]
fn live_external_links_split_by_failure_kind() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    let base = fixture_server();
    let dead = format!("{}/dead", base);
    let down = format!("http://127.0.0.1:{}/x", closed_port());
    write(
        root,
        "app/page.tsx",
        &format!(
            r#"<main><h1>Welcome</h1><a href="{}/">ok</a><a href="{}">dead</a><a href="{}">down</a></main>"#,
            base, dead, down
        ),
    );
    let mut eff = Effective::for_root(root);
    eff.live.enabled = true;
    eff.live.base_url = base;

    let out = run_audit(&eff, &mut noop).unwrap();
    let external: Vec<&Issue> = out
        .issues
        .iter()
        .filter(|i| i.category == Category::ExternalLinks)
        .collect();
    assert_eq!(external.len(), 2);
    let medium: Vec<&&Issue> = external
        .iter()
        .filter(|i| i.severity == Severity::Medium)
        .collect();
    let low: Vec<&&Issue> = external
        .iter()
        .filter(|i| i.severity == Severity::Low)
        .collect();
    assert_eq!(medium.len(), 1);
    assert!(medium[0].message.contains(&dead));
    assert!(medium[0].message.contains("404"));
    assert_eq!(low.len(), 1);
    assert!(low[0].message.contains(&down));
    assert!(external.iter().all(|i| i.file == "app/page.tsx"));
    assert_eq!(out.crawl.unwrap().external_links_checked, 3);
}

#[test]
fn unreachable_server_aborts_before_analysis() {
    let dir = tempdir().unwrap();
    write(dir.path(), "app/page.tsx", "<h1>Home</h1>");
    let port = closed_port();
    let mut eff = Effective::for_root(dir.path());
    eff.live.enabled = true;
    eff.live.base_url = format!("http://127.0.0.1:{}", port);
    let mut lines = 0;
    let err = run_audit(&eff, &mut |_: &str| lines += 1).unwrap_err();
    assert!(matches!(err, AuditError::ServerUnreachable { .. }));
    assert_eq!(lines, 0);
}
