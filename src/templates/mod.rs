use maud::{DOCTYPE, Markup, html};

use crate::{antiforgery, forms::FormErrors, models::ScoredText};

pub mod actor_movies;
pub mod actors;
pub mod movies;

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

/// Whether a form creates a new row or edits the row with this id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormAction {
    Create,
    Edit(i32),
}

impl FormAction {
    fn path(self, entity: &str) -> String {
        match self {
            FormAction::Create => format!("/{entity}/create"),
            FormAction::Edit(id) => format!("/{entity}/edit/{id}"),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            FormAction::Create => "Create",
            FormAction::Edit(_) => "Save",
        }
    }
}

pub fn home_page() -> String {
    page(
        "Marquee",
        html! {
            div class="bg-white shadow rounded-lg p-8" {
                h1 class="text-3xl font-bold text-gray-900" { "Marquee" }
                p class="mt-2 text-gray-600" { "Actors, movies and who starred in what." }
                div class="mt-8 grid gap-4 md:grid-cols-3" {
                    (home_card("/actors", "Actors", "Browse actors and what people are saying about them."))
                    (home_card("/movies", "Movies", "Browse movies and read generated reviews."))
                    (home_card("/actormovies", "Cast links", "Connect actors to the movies they appear in."))
                }
            }
        },
    )
}

pub fn error_page(title: &str, message: &str) -> String {
    page(
        title,
        html! {
            div class="max-w-xl mx-auto bg-white shadow rounded-lg p-8" {
                h1 class="text-2xl font-bold text-gray-900" { (title) }
                p class="mt-4 text-gray-700" { (message) }
                a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " · Marquee" }
                script src=(TAILWIND_CDN) {}
            }
            body class="min-h-screen bg-gray-50" {
                nav class="bg-gray-900" {
                    div class="max-w-5xl mx-auto px-6 py-3 flex gap-6 text-sm" {
                        a class="font-semibold text-white" href="/" { "Marquee" }
                        a class="text-gray-300 hover:text-white" href="/actors" { "Actors" }
                        a class="text-gray-300 hover:text-white" href="/movies" { "Movies" }
                        a class="text-gray-300 hover:text-white" href="/actormovies" { "Cast links" }
                    }
                }
                main class="max-w-5xl mx-auto px-6 py-10" { (body) }
            }
        }
    }
    .into_string()
}

fn home_card(href: &str, title: &str, blurb: &str) -> Markup {
    html! {
        a class="block rounded-lg border border-gray-200 p-6 hover:border-blue-500" href=(href) {
            h2 class="text-lg font-semibold text-gray-900" { (title) }
            p class="mt-2 text-sm text-gray-600" { (blurb) }
        }
    }
}

fn heading(title: &str, action: Option<(&str, &str)>) -> Markup {
    html! {
        div class="flex items-start justify-between gap-6" {
            h1 class="text-3xl font-bold text-gray-900" { (title) }
            @if let Some((href, label)) = action {
                a class="rounded-md bg-blue-600 px-4 py-2 text-sm font-semibold text-white hover:bg-blue-700" href=(href) { (label) }
            }
        }
    }
}

fn csrf_field(token: &str) -> Markup {
    html! { input type="hidden" name=(antiforgery::FIELD_NAME) value=(token); }
}

fn general_errors(errors: &FormErrors) -> Markup {
    html! {
        @if !errors.general().is_empty() {
            div class="mb-6 rounded-md border border-red-200 bg-red-50 p-4" {
                ul class="text-sm text-red-700 space-y-1" {
                    @for message in errors.general() {
                        li { (message) }
                    }
                }
            }
        }
    }
}

fn field_error(errors: &FormErrors, field: &str) -> Markup {
    html! {
        @if let Some(message) = errors.field(field) {
            p class="mt-1 text-sm text-red-600" { (message) }
        }
    }
}

fn text_field(
    label: &str,
    name: &str,
    kind: &str,
    value: &str,
    errors: &FormErrors,
) -> Markup {
    let border = if errors.field(name).is_some() { "border-red-500" } else { "border-gray-300" };
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class=(format!("mt-2 w-full rounded-md border {border} px-3 py-2 focus:border-blue-500 focus:outline-none"))
                type=(kind) name=(name) id=(name) value=(value);
            (field_error(errors, name))
        }
    }
}

fn file_field(label: &str, name: &str, note: Option<&str>) -> Markup {
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(name) { (label) }
            input class="mt-2 block w-full text-sm text-gray-700" type="file" accept="image/*" name=(name) id=(name);
            @if let Some(note) = note {
                p class="mt-1 text-xs text-gray-500" { (note) }
            }
        }
    }
}

fn submit_row(verb: &str, back: &str) -> Markup {
    html! {
        div class="flex items-center gap-4" {
            button class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { (verb) }
            a class="text-sm text-gray-600 hover:text-gray-900" href=(back) { "Back to list" }
        }
    }
}

fn external_link(url: &str) -> Markup {
    html! {
        @if url.is_empty() {
            span class="text-gray-400" { "—" }
        } @else {
            a class="text-blue-600 hover:text-blue-800" href=(url) target="_blank" rel="noopener noreferrer" { "IMDb" }
        }
    }
}

fn image(src: Option<String>, alt: &str) -> Markup {
    html! {
        @if let Some(src) = src {
            img class="h-48 w-36 rounded object-cover" src=(src) alt=(alt);
        } @else {
            div class="h-48 w-36 rounded bg-gray-200 flex items-center justify-center text-xs text-gray-500" { "No image" }
        }
    }
}

fn sentiment_label(score: f64) -> (&'static str, &'static str) {
    if score >= 0.05 {
        ("Positive", "bg-green-100 text-green-800")
    } else if score <= -0.05 {
        ("Negative", "bg-red-100 text-red-800")
    } else {
        ("Neutral", "bg-gray-100 text-gray-800")
    }
}

fn sentiment_badge(score: f64) -> Markup {
    let (label, classes) = sentiment_label(score);
    html! {
        span class=(format!("inline-block rounded px-2 py-0.5 text-xs font-medium {classes}")) {
            (label) " " (format!("{score:.3}"))
        }
    }
}

fn scored_items(title: &str, items: &[ScoredText], average: f64, empty: &str) -> Markup {
    html! {
        section class="mt-10" {
            div class="flex items-center justify-between" {
                h2 class="text-xl font-semibold text-gray-900" { (title) }
                div class="text-sm text-gray-600" { "Overall: " (sentiment_badge(average)) }
            }
            @if items.is_empty() {
                p class="mt-4 text-gray-500" { (empty) }
            } @else {
                ul class="mt-4 space-y-3" {
                    @for item in items {
                        li class="bg-white shadow rounded-lg p-4 flex items-start justify-between gap-4" {
                            p class="text-gray-800" { (item.text) }
                            (sentiment_badge(item.sentiment))
                        }
                    }
                }
            }
        }
    }
}

fn delete_form(action: &str, token: &str, back: &str) -> Markup {
    html! {
        form class="mt-8 flex items-center gap-4" method="post" action=(action) {
            (csrf_field(token))
            button class="rounded-md bg-red-600 px-4 py-2 font-semibold text-white hover:bg-red-700" type="submit" { "Delete" }
            a class="text-sm text-gray-600 hover:text-gray-900" href=(back) { "Back to list" }
        }
    }
}
