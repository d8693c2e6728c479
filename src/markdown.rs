// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use pulldown_cmark::Event;
use pulldown_cmark::Parser;
use pulldown_cmark::html::push_html;

/// Render a user-written story. Raw HTML in the input is shown as text
/// rather than passed through.
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let events = parser.map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        _ => event,
    });
    let mut html_output: String = String::new();
    push_html(&mut html_output, events);
    html_output
}
