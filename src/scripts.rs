//! In-page scripts for label resolution, dropdown handling and button
//! clicking.
//!
//! Each script is a function expression invoked with JSON-encoded
//! arguments and returns a JSON string describing what it did.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Resolve `label` to a control and commit `value` to it.
///
/// Labels match by substring, bare spans by exact text. Custom dropdown
/// hosts are only opened here; picking the option is polled separately.
const FILL_FIELD_JS: &str = r#"
(label, value, changeDelay) => {
    const norm = el => (el.innerText || el.textContent || '').trim().toLowerCase();
    const wanted = label.toLowerCase();
    let target = null;

    for (const lbl of document.querySelectorAll('label')) {
        if (!norm(lbl).includes(wanted)) continue;
        target = lbl.htmlFor
            ? document.getElementById(lbl.htmlFor)
            : lbl.querySelector('input, textarea, select');
        if (target) break;
    }

    if (!target) {
        const span = Array.from(document.querySelectorAll('span')).find(sp => norm(sp) === wanted);
        const box = span ? span.closest('div') : null;
        if (box) target = box.querySelector('input, textarea, select');
    }

    if (!target) return JSON.stringify({ status: 'not_found' });

    try {
        return commit(target);
    } catch (err) {
        return JSON.stringify({ status: 'failed', message: String(err) });
    }

    function commit(target) {
        target.focus();
        target.click();

        const host = target.closest('lf-select');
        if (host) {
            host.click();
            return JSON.stringify({ status: 'dropdown_opened' });
        }

        if (target.tagName === 'SELECT') {
            const needle = value.toLowerCase();
            const option = Array.from(target.options).find(
                o => o.text.toLowerCase() === needle || o.value.toLowerCase() === needle
            );
            if (!option) return JSON.stringify({ status: 'no_matching_option' });
            target.value = option.value;
            target.dispatchEvent(new Event('input', { bubbles: true }));
            setTimeout(() => target.dispatchEvent(new Event('change', { bubbles: true })), changeDelay);
            return JSON.stringify({ status: 'selected' });
        }

        const previous = target.value;
        target.value = value;
        const tracker = target._valueTracker;
        const tracked = !!tracker && typeof tracker.setValue === 'function';
        if (tracked) tracker.setValue(previous);
        target.dispatchEvent(new Event('input', { bubbles: true }));
        target.dispatchEvent(new Event('change', { bubbles: true }));
        target.blur();
        return JSON.stringify({ status: 'filled', tracked });
    }
}
"#;

/// Type `value` into the titled input of the `lf-select` next to `label`.
const TYPE_DROPDOWN_JS: &str = r#"
(label, value) => {
    const norm = el => (el.innerText || el.textContent || '').trim().toLowerCase();
    const wanted = label.toLowerCase();
    const span = Array.from(document.querySelectorAll('span')).find(sp => norm(sp) === wanted);
    const holder = span ? span.closest('label') : null;
    const row = holder ? holder.parentElement : null;
    const host = row ? row.querySelector('lf-select') : null;
    const input = host ? host.querySelector('input[title]') : null;
    if (!input) return JSON.stringify({ status: 'not_found' });

    try {
        input.focus();
        input.value = value;
        input.dispatchEvent(new Event('input', { bubbles: true }));
        input.dispatchEvent(new Event('change', { bubbles: true }));
    } catch (err) {
        return JSON.stringify({ status: 'failed', message: String(err) });
    }
    return JSON.stringify({ status: 'typed' });
}
"#;

/// Click the option in the open dropdown panel whose text equals `value`.
const PICK_OPTION_JS: &str = r#"
(value) => {
    const norm = el => (el.innerText || el.textContent || '').trim().toLowerCase();
    const panel = document.querySelector('lf-dropdown-panel');
    if (!panel) return JSON.stringify({ status: 'pending' });
    const wanted = value.toLowerCase();
    const option = Array.from(panel.querySelectorAll('span')).find(sp => norm(sp) === wanted);
    if (!option) return JSON.stringify({ status: 'pending' });
    option.scrollIntoView({ block: 'center' });
    option.click();
    return JSON.stringify({ status: 'picked' });
}
"#;

/// Click every button whose own text, or a nested span's text, equals
/// `choice`. Each button is clicked at most once.
const CLICK_BUTTONS_JS: &str = r#"
(choice) => {
    const wanted = choice.toLowerCase();
    const clicked = new Set();
    for (const el of document.querySelectorAll('button, button span')) {
        const text = (el.innerText || el.textContent || '').trim().toLowerCase();
        if (text !== wanted) continue;
        const button = el.tagName.toLowerCase() === 'button' ? el : el.closest('button');
        if (!button || clicked.has(button)) continue;
        clicked.add(button);
        button.scrollIntoView({ behavior: 'smooth', block: 'center' });
        button.click();
    }
    return JSON.stringify({ clicked: clicked.size });
}
"#;

/// What the fill script reported.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldStatus {
    Filled {
        #[serde(default)]
        tracked: bool,
    },
    Selected,
    NoMatchingOption,
    DropdownOpened,
    NotFound,
    /// The control threw while being written to.
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TypeStatus {
    Typed,
    NotFound,
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PickStatus {
    Picked,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ClickStatus {
    pub clicked: usize,
}

fn js_string(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::JsError(e.to_string()))
}

pub fn fill_field(label: &str, value: &str, change_delay_ms: u64) -> Result<String> {
    let label_js = js_string(label)?;
    let value_js = js_string(value)?;
    Ok(format!("({FILL_FIELD_JS})({label_js}, {value_js}, {change_delay_ms})"))
}

pub fn type_dropdown(label: &str, value: &str) -> Result<String> {
    let label_js = js_string(label)?;
    let value_js = js_string(value)?;
    Ok(format!("({TYPE_DROPDOWN_JS})({label_js}, {value_js})"))
}

pub fn pick_option(value: &str) -> Result<String> {
    let value_js = js_string(value)?;
    Ok(format!("({PICK_OPTION_JS})({value_js})"))
}

pub fn click_buttons(choice: &str) -> Result<String> {
    let choice_js = js_string(choice)?;
    Ok(format!("({CLICK_BUTTONS_JS})({choice_js})"))
}

/// Decode the JSON string a script returned.
pub fn decode<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| Error::JsError(format!("unexpected script result {raw:?}: {e}")))
}
