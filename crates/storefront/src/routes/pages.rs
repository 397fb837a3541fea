//! Static page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::instrument;

use mousse_melts_core::{CategoryFilter, Route};

use crate::filters;
use crate::middleware::Shopper;
use crate::routes::home::render_home;
use crate::routes::layout::ShopChrome;
use crate::state::AppState;

/// One chapter of the story timeline.
pub struct Chapter {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub content: &'static str,
}

const CHAPTERS: [Chapter; 7] = [
    Chapter {
        title: "The Beginning",
        subtitle: "Two Friends, One Vision",
        content: "MoussenMelts Bake Shop isn't just a business. It's a story of two friends, their dreams, and their determination. Both came from business-oriented families, but their true passion lay in education and learning.",
    },
    Chapter {
        title: "The Education",
        subtitle: "Following the Traditional Path",
        content: "After completing their bachelor's degrees, they stepped into the job market, hopeful and eager to make their mark in the world. They believed that hard work and education would open all doors.",
    },
    Chapter {
        title: "The Challenge",
        subtitle: "Reality Hits Hard",
        content: "But reality hit hard. Jobs were scarce, and even when opportunities arose, the salaries were so low they couldn't even cover basic expenses like fuel. The traditional path wasn't leading anywhere.",
    },
    Chapter {
        title: "The Spark",
        subtitle: "A Moment of Clarity",
        content: "One day, while sitting at a tea stall, they found themselves deep in thought. The aroma of chai, the buzz of conversations around them, and suddenly a question that would change everything.",
    },
    Chapter {
        title: "The Idea",
        subtitle: "Why Not Us?",
        content: "Why not start something of their own? Why not build a business where they could be their own bosses, shaping their own future? That day, the seed of MoussenMelts was planted in their hearts.",
    },
    Chapter {
        title: "The Birth",
        subtitle: "MoussenMelts Is Born",
        content: "With passion in their hearts and determination in their souls, they began crafting desserts that would bring smiles to faces. Every mousse, every melt, every creation became a piece of their dream.",
    },
    Chapter {
        title: "The Future",
        subtitle: "Just The Beginning",
        content: "This journey has become unstoppable. MoussenMelts is not just a brand. It's a testament to the power of dreams, faith, and relentless effort. And this is just the beginning.",
    },
];

/// Story page template.
#[derive(Template, WebTemplate)]
#[template(path = "our_story.html")]
pub struct OurStoryTemplate {
    pub chrome: ShopChrome,
    pub chapters: &'static [Chapter],
}

/// Display the story page.
#[instrument(skip(state, shopper))]
pub async fn our_story(State(state): State<AppState>, shopper: Shopper) -> impl IntoResponse {
    let snapshot = state.catalog().snapshot().await;

    OurStoryTemplate {
        chrome: ShopChrome::new(Route::OurStory, &snapshot, &shopper, Utc::now()),
        chapters: &CHAPTERS,
    }
}

/// Unknown paths.
///
/// Page requests render the home page, as every unknown client route
/// resolves to Home. API paths and non-GET requests get a 404.
#[instrument(skip(state, shopper))]
pub async fn fallback(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    shopper: Shopper,
) -> Response {
    if method != Method::GET || uri.path().starts_with("/api/") {
        return StatusCode::NOT_FOUND.into_response();
    }

    render_home(&state, &shopper, &CategoryFilter::All)
        .await
        .into_response()
}
