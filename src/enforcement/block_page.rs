// src/enforcement/block_page.rs
// Static denial pages served to blocked clients

pub const BLOCKED_MESSAGE: &str = "You are blocked from accessing this website.";

pub enum BlockReason {
    BlockedAddress,
    StoreUnavailable,
}

pub fn render_block_page(reason: BlockReason) -> String {
    match reason {
        BlockReason::BlockedAddress => BLOCKED_ADDRESS_HTML.to_string(),
        BlockReason::StoreUnavailable => STORE_UNAVAILABLE_HTML.to_string(),
    }
}

const BLOCKED_ADDRESS_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Access Blocked</title>
  <style>
    body { font-family: sans-serif; background: #f9f9f9; margin: 2em; }
    .block-container { background: #fff; padding: 2em; border-radius: 8px; box-shadow: 0 2px 8px #ccc; max-width: 480px; margin: auto; }
  </style>
</head>
<body>
  <div class="block-container">
    <p>You are blocked from accessing this website.</p>
  </div>
</body>
</html>
"#;

const STORE_UNAVAILABLE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Service Unavailable</title>
</head>
<body>
  <p>Key-value store error (fail-closed)</p>
</body>
</html>
"#;
