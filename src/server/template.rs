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

use maud::DOCTYPE;
use maud::Markup;
use maud::html;

pub fn page_template(title: &str, body: Markup) -> Markup {
    render(title, body, None)
}

/// A page that reloads itself after `seconds`, used while a mismatched
/// pair is on the board.
pub fn refreshing_page_template(title: &str, body: Markup, seconds: u64) -> Markup {
    render(title, body, Some(seconds))
}

fn render(title: &str, body: Markup, refresh: Option<u64>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                @if let Some(seconds) = refresh {
                    meta http-equiv="refresh" content=(seconds);
                }
                title { (title) " · pokememo" }
                link rel="stylesheet" href="/style.css";
            }
            body {
                nav {
                    span.logo { "pokememo" }
                    div.links {
                        a href="/" { "Pokédex" }
                        a href="/game" { "Memory Game" }
                    }
                }
                main {
                    (body)
                }
            }
        }
    }
}

pub fn error_page(message: &str) -> Markup {
    page_template(
        "Error",
        html! {
            div.error {
                p { (message) }
            }
        },
    )
}
