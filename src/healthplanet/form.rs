use reqwest::{
    Response,
    header::{ORIGIN, REFERER},
};
use scraper::{ElementRef, Html, Selector};

use crate::error::HealthPlanetError;

use super::Session;

/// A form lifted out of an HTML page: its raw `action` and the name/value
/// pairs of every named `<input>`, hidden ones included, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlForm {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

impl HtmlForm {
    /// Finds the first `<form>` whose `name` attribute equals `form_name`.
    ///
    /// Fields are the inputs a browser would submit with the form:
    /// descendants of the form, inputs pointing at it through `form="<id>"`,
    /// and inputs the HTML parser moved out of a form opened directly inside
    /// a `<table>` (see [`table_adopted_inputs`]). Inputs without a `name` are
    /// ignored; inputs without a `value` get an empty string.
    ///
    /// # Arguments
    ///
    /// * `html` - Page body as returned by the server
    /// * `form_name` - Value of the form's `name` attribute
    ///
    /// # Returns
    ///
    /// `None` when no form with that name exists.
    ///
    /// # Example
    ///
    /// ```
    /// let form = HtmlForm::find(&page.body, "login.LoginForm")
    ///     .ok_or(HealthPlanetError::FormNotFound("login.LoginForm"))?;
    /// ```
    pub fn find(html: &str, form_name: &str) -> Option<HtmlForm> {
        let document = Html::parse_document(html);
        let form_sel = match Selector::parse("form") {
            Ok(s) => s,
            Err(_) => return None,
        };
        let input_sel = match Selector::parse("input") {
            Ok(s) => s,
            Err(_) => return None,
        };

        let form = document
            .select(&form_sel)
            .find(|form| form.value().attr("name") == Some(form_name))?;
        let form_id = form.value().attr("id");
        let adopted = table_adopted_inputs(form);

        let fields = document
            .select(&input_sel)
            .filter(|input| is_owned_by(*input, form, form_id, &adopted))
            .filter_map(|input| {
                let name = input.value().attr("name")?;
                let value = input.value().attr("value").unwrap_or("");
                Some((name.to_string(), value.to_string()))
            })
            .collect();

        Some(HtmlForm {
            action: form.value().attr("action").unwrap_or("").to_string(),
            fields,
        })
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Overrides the field in place, or appends it if the form lacks it.
    pub fn set_field(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }
}

/// Whether `input` belongs to `form`. An explicit `form` attribute overrides
/// the tree position.
fn is_owned_by(
    input: ElementRef<'_>,
    form: ElementRef<'_>,
    form_id: Option<&str>,
    adopted: &[ElementRef<'_>],
) -> bool {
    match input.value().attr("form") {
        Some(owner) => form_id == Some(owner),
        None => {
            input.ancestors().any(|node| node.id() == form.id())
                || adopted.iter().any(|a| a.id() == input.id())
        }
    }
}

/// Inputs that belong to a form the parser emptied.
///
/// A `<form>` start tag met in table context is inserted as an empty element
/// and popped at once; the inputs written inside it end up in the following
/// rows and cells while still being submitted with it. Those are the inputs
/// after the form inside its enclosing `<table>`, up to the next `<form>`.
fn table_adopted_inputs(form: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let in_table_context = form
        .parent()
        .and_then(|parent| parent.value().as_element().map(|e| e.name()))
        .is_some_and(|name| matches!(name, "table" | "tbody" | "thead" | "tfoot" | "tr"));
    if !in_table_context || form.has_children() {
        return Vec::new();
    }

    let Some(table) = form
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "table")
    else {
        return Vec::new();
    };

    table
        .descendants()
        .skip_while(|node| node.id() != form.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .take_while(|e| e.value().name() != "form")
        .filter(|e| e.value().name() == "input")
        .collect()
}

/// Final response of a request after redirects were followed.
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Page {
    /// Reads a response, failing on a non-success status.
    ///
    /// `url` is the address the response came from, so after redirects it is
    /// the last hop.
    ///
    /// # Errors
    ///
    /// [`HealthPlanetError::Http`] for a 4xx/5xx status or when the body
    /// cannot be read.
    pub async fn read(response: Response) -> Result<Page, HealthPlanetError> {
        let response = response.error_for_status()?;
        let url = response.url().to_string();
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Page { url, status, body })
    }

    /// GETs `url` on `session`, following redirects.
    ///
    /// # Arguments
    ///
    /// * `session` - Session whose cookie store the response may update
    /// * `url` - Absolute URL to request
    ///
    /// # Errors
    ///
    /// Same as [`Page::read`], plus transport failures and timeouts.
    ///
    /// # Example
    ///
    /// ```
    /// let login_page = Page::get(&session, &authorization_url(session.origin(), &credentials)).await?;
    /// ```
    pub async fn get(session: &Session, url: &str) -> Result<Page, HealthPlanetError> {
        let response = session.client().get(url).send().await?;
        Page::read(response).await
    }
}

/// Fills in and posts an [`HtmlForm`] the way a browser would.
pub struct FormSubmitter<'a> {
    session: &'a Session,
    form: HtmlForm,
    page_url: String,
}

impl<'a> FormSubmitter<'a> {
    /// Prepares `form` for submission.
    ///
    /// # Arguments
    ///
    /// * `session` - Session the page was loaded with; its cookies go along
    /// * `form` - Form as found on the page, hidden fields included
    /// * `page_url` - Final URL of the page holding the form. Sent as
    ///   `Referer` and used as base for relative actions
    pub fn new(session: &'a Session, form: HtmlForm, page_url: &str) -> Self {
        Self {
            session,
            form,
            page_url: page_url.to_string(),
        }
    }

    /// Sets a field before submission. See [`HtmlForm::set_field`].
    pub fn set_field(&mut self, name: &str, value: &str) {
        self.form.set_field(name, value);
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.form.fields
    }

    /// Absolute URL the form will be posted to, per [`resolve_action`].
    pub fn action_url(&self) -> String {
        resolve_action(&self.form.action, self.session.origin(), &self.page_url)
    }

    /// Posts the fields form-encoded with `Referer` and `Origin` set, follows
    /// redirects and returns the final page.
    ///
    /// # Errors
    ///
    /// [`HealthPlanetError::Http`] when the request fails, times out or any
    /// hop ends in an error status.
    ///
    /// # Example
    ///
    /// ```
    /// let mut consent = FormSubmitter::new(&session, form, &page.url);
    /// consent.set_field("approval", "true");
    /// let redirect = consent.submit().await?;
    /// ```
    pub async fn submit(self) -> Result<Page, HealthPlanetError> {
        let action = self.action_url();
        let response = self
            .session
            .client()
            .post(&action)
            .header(REFERER, &self.page_url)
            .header(ORIGIN, self.session.origin())
            .form(&self.form.fields)
            .send()
            .await?;

        Page::read(response).await
    }
}

/// Turns a form `action` into an absolute URL.
///
/// Absolute actions are kept, `/`-rooted actions are prefixed with `origin`,
/// anything else is joined to the directory of `page_url`.
pub fn resolve_action(action: &str, origin: &str, page_url: &str) -> String {
    let lower = action.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return action.to_string();
    }

    if action.starts_with('/') {
        return format!("{}{}", origin.trim_end_matches('/'), action);
    }

    format!("{}/{}", page_directory(page_url), action)
}

fn page_directory(page_url: &str) -> &str {
    let end = page_url.find(['?', '#']).unwrap_or(page_url.len());
    let path = &page_url[..end];
    match path.rsplit_once('/') {
        // keep "scheme://host" intact when the url has no path
        Some((dir, _)) if !dir.ends_with('/') => dir,
        _ => path.trim_end_matches('/'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_directory_strips_query_and_last_segment() {
        assert_eq!(
            page_directory("https://h.example/oauth/auth?redirect_uri=https://x/y"),
            "https://h.example/oauth"
        );
        assert_eq!(page_directory("https://h.example/a/b/"), "https://h.example/a/b");
        assert_eq!(page_directory("https://h.example"), "https://h.example");
    }
}
