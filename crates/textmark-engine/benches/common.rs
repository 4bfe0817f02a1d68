// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markup(paragraphs: usize) -> String {
    let base = "<p>The <b>quick</b> brown fox jumps over the <i>lazy</i> dog.</p>\n<p>Pack my box with <em>five dozen</em> liquor jugs.</p>\n";
    format!("<div>{}</div>", base.repeat(paragraphs))
}

#[allow(dead_code)]
pub fn generate_nested_markup(sections: usize, depth: usize) -> String {
    let mut markup = String::new();
    for section in 0..sections {
        markup.push_str(&format!("<section><h2>Section {section}</h2>"));
        for level in 0..depth {
            markup.push_str(&format!("<div>Level {level} text with <span>inline</span> markup "));
        }
        markup.push_str(&"</div>".repeat(depth));
        markup.push_str("</section>");
    }
    markup
}
