#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod state;

pub(crate) use form::{
    assert_form_error_message, assert_form_input, assert_form_submit_button_with_text,
    assert_hx_endpoint, must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document, parse_html_fragment, select_text};
pub(crate) use http::{assert_hx_redirect, assert_redirect, get_header};
pub(crate) use state::{TEST_PASSWORD, get_test_app_state, insert_test_user};
