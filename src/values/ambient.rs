//! Opaque handles for the ambient collaborators that surround a print task.
//!
//! The planner only needs these as type tags for the attribute catalogue;
//! their real behavior lives in the template/rendering layers.

use std::collections::HashMap;

/// The active report template.
#[derive(Debug, Clone, Default)]
pub struct Template {
    pub name: String,
}

/// Document metadata applied to PDF output.
#[derive(Debug, Clone, Default)]
pub struct PdfConfig {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Vec<String>,
}

/// Headers forwarded from the originating print request.
#[derive(Debug, Clone, Default)]
pub struct RequestHeaders {
    pub headers: HashMap<String, Vec<String>>,
}
