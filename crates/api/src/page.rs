//! The single-page form served at `/`.

/// Topic field, run button, the three output panes and a status line.
///
/// Blank topics are rejected in the browser with a warning and no request.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Quill: research, write, critique</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 1100px; margin: 2rem auto; padding: 0 1rem; }
  form { display: flex; gap: 0.5rem; margin-bottom: 1rem; }
  input[type=text] { flex: 1; padding: 0.5rem; font-size: 1rem; }
  button { padding: 0.5rem 1.25rem; font-size: 1rem; }
  .panes { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem; }
  .pane h2 { font-size: 1rem; margin: 0 0 0.25rem; }
  textarea { width: 100%; height: 28rem; font-family: ui-monospace, monospace; font-size: 0.85rem; }
  #status { margin: 0.5rem 0 1rem; min-height: 1.25rem; }
  #status.warning { color: #a15c00; }
  #status.error { color: #b00020; }
</style>
</head>
<body>
<h1>Quill</h1>
<p>Enter a topic. Quill looks it up, drafts a short article and reviews the draft.</p>
<form id="run-form">
  <input id="topic" type="text" name="topic" placeholder="e.g. Turing Machine" autocomplete="off">
  <button id="run" type="submit">Run</button>
</form>
<div id="status"></div>
<div class="panes">
  <div class="pane"><h2>Research (JSON)</h2><textarea id="research" readonly></textarea></div>
  <div class="pane"><h2>Draft</h2><textarea id="draft" readonly></textarea></div>
  <div class="pane"><h2>Feedback</h2><textarea id="feedback" readonly></textarea></div>
</div>
<script>
  const form = document.getElementById("run-form");
  const button = document.getElementById("run");
  const statusLine = document.getElementById("status");

  function setStatus(text, kind) {
    statusLine.textContent = text;
    statusLine.className = kind || "";
  }

  form.addEventListener("submit", async (event) => {
    event.preventDefault();
    const topic = document.getElementById("topic").value.trim();
    if (!topic) {
      setStatus("Please enter a topic.", "warning");
      return;
    }

    button.disabled = true;
    setStatus("Running...");
    try {
      const response = await fetch("/api/v1/run", {
        method: "POST",
        headers: { "Content-Type": "application/json" },
        body: JSON.stringify({ topic }),
      });
      const body = await response.json();
      if (!response.ok) {
        setStatus(body.error || "Request failed.", "error");
        return;
      }
      document.getElementById("research").value = body.research_json;
      document.getElementById("draft").value = body.draft;
      document.getElementById("feedback").value = body.feedback;
      setStatus(body.status);
    } catch (err) {
      setStatus("Request failed: " + err, "error");
    } finally {
      button.disabled = false;
    }
  });
</script>
</body>
</html>
"#;
