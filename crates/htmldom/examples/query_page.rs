//! Parse a page and run a few queries against it
//!
//! Usage: cargo run --example query_page -- [file.html]

use htmldom::{
    get_attribute, get_element_by_id, get_elements_by_class, get_elements_by_tag, inner_text,
    outer_html, parse_document, parse_document_from_reader,
};
use std::fs::File;

const SAMPLE: &str = r#"<html><body>
<nav id="menu"><a class="link active" href="/">Home</a><a class="link" href="/docs">Docs</a></nav>
<main><h1>Welcome</h1><p>Line one<br>Line two<script>track()</script></p></main>
</body></html>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let arena = match std::env::args().nth(1) {
        Some(path) => parse_document_from_reader(&mut File::open(path)?)?,
        None => parse_document(SAMPLE)?,
    };
    let root = arena.root_id().ok_or("document has no root")?;
    println!("Parsed {} nodes", arena.len());

    if let Some(menu) = get_element_by_id(&arena, root, "menu") {
        println!("#menu: {}", outer_html(&arena, menu));
    }

    for link in get_elements_by_class(&arena, root, "link") {
        let node = arena.get(link)?;
        println!(
            "link {:?} -> {}",
            inner_text(&arena, link),
            get_attribute(node, "href")
        );
    }

    for p in get_elements_by_tag(&arena, root, "p") {
        println!("paragraph: {:?}", inner_text(&arena, p));
    }

    Ok(())
}
