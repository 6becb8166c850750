//! Success and error messages swapped into the page by htmx.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

/// A dismissable message for the `#alert-container` element of the base layout.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub kind: AlertKind,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> Alert<'a> {
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            kind: AlertKind::Success,
            message,
            details,
        }
    }

    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            kind: AlertKind::Error,
            message,
            details,
        }
    }

    pub fn into_html(self) -> Markup {
        let style = match self.kind {
            AlertKind::Success => {
                "flex items-start gap-3 p-4 rounded-lg border text-green-800 \
                border-green-300 bg-green-50 dark:bg-gray-800 dark:text-green-400 \
                dark:border-green-800"
            }
            AlertKind::Error => {
                "flex items-start gap-3 p-4 rounded-lg border text-red-800 \
                border-red-300 bg-red-50 dark:bg-gray-800 dark:text-red-400 \
                dark:border-red-800"
            }
        };

        html!(
            div role="alert" class=(style)
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="text-sm font-bold"
                    onclick="this.parentElement.remove()"
                {
                    "✕"
                }
            }
        )
    }

    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, self.into_html()).into_response()
    }
}
