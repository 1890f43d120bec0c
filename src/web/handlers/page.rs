use axum::response::{Html, IntoResponse};

// Single-page form. All state lives in the server-side controller; the page
// only mirrors `/api/state` and posts the fields back.
const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>qrlink - URL to QR code</title>
    <style>
        :root { --muted: #9aa4b2; --error: #ff9aa2; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 720px;
            margin: 0 auto;
            padding: 20px;
            color: #e6e9ef;
            background: #1b1f27;
        }
        h1 { text-align: center; }
        .card {
            border: 1px solid #333a46;
            border-radius: 8px;
            padding: 20px;
            display: flex;
            flex-direction: column;
            gap: 12px;
        }
        .row { display: flex; gap: 10px; align-items: center; flex-wrap: wrap; }
        input[type=url], input[type=text] { flex: 1; padding: 8px; }
        .button {
            background-color: #3498db;
            color: white;
            border: none;
            padding: 10px 15px;
            border-radius: 4px;
            cursor: pointer;
            text-decoration: none;
        }
        .button[aria-disabled=true] { opacity: 0.4; pointer-events: none; }
        #message { min-height: 1.2em; color: var(--muted); }
        #message.error { color: var(--error); }
        #qrcode { display: flex; justify-content: center; min-height: 64px; }
        #qrcode img { max-width: 100%; image-rendering: pixelated; }
    </style>
</head>
<body>
    <h1>qrlink</h1>
    <form class="card" id="qrForm">
        <div class="row">
            <label for="urlInput">Website URL</label>
            <input type="text" id="urlInput" placeholder="example.com" autocomplete="off">
        </div>
        <div class="row">
            <label for="sizeRange">Size</label>
            <input type="range" id="sizeRange" min="128" max="1024" step="1">
            <input type="number" id="sizeNumber" min="64" max="2048">
        </div>
        <div class="row">
            <label for="fgColor">Foreground</label>
            <input type="color" id="fgColor">
            <label><input type="checkbox" id="bgToggle"> Background</label>
            <input type="color" id="bgColor">
        </div>
        <div class="row">
            <button type="submit" class="button">Generate</button>
            <button type="button" class="button" id="clearBtn">Clear</button>
            <a class="button" id="downloadBtn" download="qrcode.png" aria-disabled="true">Download PNG</a>
        </div>
        <p id="message" role="status"></p>
        <div id="qrcode"></div>
    </form>

    <script>
        (() => {
            const $ = (sel) => document.querySelector(sel);
            const form = $('#qrForm');
            const urlInput = $('#urlInput');
            const sizeRange = $('#sizeRange');
            const sizeNumber = $('#sizeNumber');
            const fgColor = $('#fgColor');
            const bgToggle = $('#bgToggle');
            const bgColor = $('#bgColor');
            const message = $('#message');
            const qrcodeEl = $('#qrcode');
            const downloadBtn = $('#downloadBtn');
            const clearBtn = $('#clearBtn');

            function show(view) {
                urlInput.value = view.url;
                sizeNumber.value = view.size;
                sizeRange.value = view.range_value;
                fgColor.value = view.foreground;
                bgToggle.checked = view.background_enabled;
                bgColor.value = view.background;
                bgColor.disabled = !view.background_picker_enabled;

                message.textContent = view.message ? view.message.text : '';
                message.classList.toggle('error', !!view.message && view.message.tone === 'error');

                qrcodeEl.innerHTML = '';
                if (view.preview_data_url) {
                    const img = document.createElement('img');
                    img.src = view.preview_data_url;
                    img.alt = 'QR code';
                    qrcodeEl.appendChild(img);
                }

                if (view.download_ready) {
                    downloadBtn.href = '/api/download?g=' + view.generation;
                    downloadBtn.setAttribute('aria-disabled', 'false');
                } else {
                    downloadBtn.removeAttribute('href');
                    downloadBtn.setAttribute('aria-disabled', 'true');
                }
            }

            async function post(path, body) {
                const response = await fetch(path, {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify(body || {}),
                });
                show(await response.json());
            }

            sizeRange.addEventListener('input', () => { sizeNumber.value = sizeRange.value; });
            sizeNumber.addEventListener('change', () => {
                const v = Math.max(64, Math.min(2048, Number(sizeNumber.value) || 256));
                sizeNumber.value = v;
                sizeRange.value = Math.max(128, Math.min(1024, v));
            });
            bgToggle.addEventListener('change', () => { bgColor.disabled = !bgToggle.checked; });

            form.addEventListener('submit', (e) => {
                e.preventDefault();
                post('/api/generate', {
                    url: urlInput.value,
                    size: sizeNumber.value,
                    foreground: fgColor.value,
                    background_enabled: bgToggle.checked,
                    background: bgColor.value,
                }).catch((err) => console.error('Generate failed:', err));
            });

            clearBtn.addEventListener('click', () => {
                post('/api/clear').catch((err) => console.error('Clear failed:', err));
            });

            fetch('/api/state')
                .then((r) => r.json())
                .then(show)
                .catch((err) => console.error('Error loading state:', err));
        })();
    </script>
</body>
</html>
"##;

// Serve the form page
pub async fn serve_index() -> impl IntoResponse {
    Html(INDEX_HTML)
}
