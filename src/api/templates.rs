use askama::Template;

// Monochrome pages, no external CSS/JS

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>linkpeek</title>
    <style>
      body{font-family:system-ui,sans-serif;background:#fff;color:#000}
      main{max-width:560px;margin:4rem auto}
      label,input,textarea,button{display:block;margin:0.6rem 0;width:100%}
    </style>
  </head>
  <body>
    <main>
      <h1>Create a short link</h1>
      <form action="/" method="post" enctype="multipart/form-data">
        <label>Original URL
          <input type="url" name="original_url" required>
        </label>
        <label>Description
          <textarea name="description" rows="3"></textarea>
        </label>
        <label>Thumbnail
          <input type="file" name="thumbnail" accept="image/*">
        </label>
        <button type="submit">Create</button>
      </form>
    </main>
  </body>
</html>"#,
    ext = "html"
)]
pub struct IndexTemplate;

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>linkpeek result</title>
    <style>
      body{font-family:system-ui,sans-serif;background:#fff;color:#000}
      main{max-width:560px;margin:4rem auto}
      a{color:#000}
      .error{color:#a00}
    </style>
  </head>
  <body>
    <main>
      {%- if let Some(link) = link %}
      <h1>Short link created</h1>
      <p><strong>{{ link.short_code }}</strong></p>
      <p><a href="{{ link.short_url }}">{{ link.short_url }}</a></p>
      {%- else %}
      <h1>Could not create the link</h1>
      <p class="error">{{ error }}</p>
      {%- endif %}
      <p><a href="/">Create another</a></p>
    </main>
  </body>
</html>"#,
    ext = "html"
)]
pub struct ResultTemplate<'a> {
    pub link: Option<&'a crate::services::LinkCreateResult>,
    pub error: &'a str,
}
