//! Blog editor pages for the web UI.
//!
//! One template serves both flows: create posts to `/posts`, edit posts
//! to `/posts/{id}`. The handler re-renders this page with the
//! submitted values when validation or the backend write fails.

use maud::{html, Markup, Render};

use crate::auth::CurrentUser;
use crate::components::{BaseLayout, Form, FormGroup, Input, Message, Select, SelectOption, TextArea};
use crate::posts::model::{Category, Post};

/// Parameters for rendering the editor page.
#[derive(Debug)]
pub struct EditorPageParams<'a> {
    /// The signed-in viewer; `None` only for guest composing
    pub user: Option<&'a CurrentUser>,
    /// Post being edited, `None` when creating
    pub post_id: Option<&'a str>,
    /// Title field value
    pub title: &'a str,
    /// Category field value ("" for no selection)
    pub category: &'a str,
    /// Description field value
    pub description: &'a str,
    /// Optional error message shown above the form
    pub error: Option<&'a str>,
}

impl<'a> EditorPageParams<'a> {
    /// Params for an empty create form.
    #[must_use]
    pub fn create(user: Option<&'a CurrentUser>) -> Self {
        Self {
            user,
            post_id: None,
            title: "",
            category: "",
            description: "",
            error: None,
        }
    }

    /// Params for an edit form pre-filled from the existing post.
    #[must_use]
    pub fn edit(user: &'a CurrentUser, post: &'a Post) -> Self {
        Self {
            user: Some(user),
            post_id: Some(&post.id),
            title: &post.title,
            category: &post.category,
            description: &post.description,
            error: None,
        }
    }

    /// Target an existing post (used when re-rendering a failed update).
    #[must_use]
    pub fn editing(mut self, post_id: &'a str) -> Self {
        self.post_id = Some(post_id);
        self
    }

    /// Carry submitted values back into the form.
    #[must_use]
    pub fn with_values(mut self, title: &'a str, category: &'a str, description: &'a str) -> Self {
        self.title = title;
        self.category = category;
        self.description = description;
        self
    }

    /// Set the error message.
    #[must_use]
    pub fn with_error(mut self, error: &'a str) -> Self {
        self.error = Some(error);
        self
    }
}

/// Render the create/edit page.
///
/// # Example
///
/// ```ignore
/// // Empty create form
/// let page = render_editor_page(&EditorPageParams::create(Some(&user)));
///
/// // Edit form for an existing post
/// let page = render_editor_page(&EditorPageParams::edit(&user, &post));
/// ```
#[must_use]
pub fn render_editor_page(params: &EditorPageParams<'_>) -> Markup {
    let editing = params.post_id.is_some();
    let heading = if editing { "Edit Blog" } else { "Create New Blog" };

    let content = html! {
        div class="editor-container" {
            h1 class="editor-title" { (heading) }

            @if let Some(e) = params.error {
                (Message::error(e))
            }

            (render_editor_form(params))
        }
    };

    BaseLayout::new(heading, params.user).render(content)
}

/// Render the editor form with the current field values.
fn render_editor_form(params: &EditorPageParams<'_>) -> Markup {
    let editing = params.post_id.is_some();
    let action = params
        .post_id
        .map_or_else(|| "/posts".to_string(), |id| format!("/posts/{id}"));
    let submit_label = if editing {
        "💾 Update Blog"
    } else {
        "🚀 Publish Blog"
    };

    let category_options = Category::ALL
        .iter()
        .map(|c| SelectOption::new(c.as_str(), c.as_str()))
        .collect();
    let category_select = Select::new("category")
        .id("category")
        .placeholder("Select a category")
        .options(category_options)
        .selected_opt((!params.category.is_empty()).then_some(params.category))
        .required()
        .render();

    let image_group = {
        let group = FormGroup::new(
            "Image (optional)",
            "image",
            Input::file("image").id("image").accept("image/*").render(),
        )
        .class("form-group");
        if editing {
            group.help("Leave empty to keep the current image")
        } else {
            group
        }
    };

    let fields = html! {
        (FormGroup::new(
            "Title",
            "title",
            Input::text("title")
                .id("title")
                .required()
                .placeholder("Enter your blog title")
                .value_opt((!params.title.is_empty()).then_some(params.title))
                .render(),
        )
        .class("form-group"))

        (FormGroup::new("Category", "category", category_select).class("form-group"))

        (FormGroup::new(
            "Description",
            "description",
            TextArea::new("description")
                .id("description")
                .rows(8)
                .required()
                .placeholder("Write your blog content here...")
                .value_opt((!params.description.is_empty()).then_some(params.description))
                .render(),
        )
        .class("form-group"))

        (image_group)

        button class="submit-btn" type="submit" { (submit_label) }
    };

    Form::post(&action, fields)
        .class("editor-form")
        .multipart()
        .render()
}
