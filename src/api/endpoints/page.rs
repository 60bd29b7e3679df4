//! Single-page browser UI, served at `/`.

use axum::response::Html;

/// `GET /`
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// ═══════════════════════════════════════════════════════════
// Page HTML (self-contained, no external resources)
// ═══════════════════════════════════════════════════════════

pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="ko">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>AI Patient-Friendly Note Translator</title>
  <style>
    * { box-sizing: border-box; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans KR', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917; margin: 0;
      display: grid; grid-template-columns: 340px 1fr; min-height: 100vh;
    }
    aside { background: #f0f2f6; padding: 24px; }
    main { padding: 32px 48px; max-width: 960px; }
    h1 { margin: 0 0 8px; font-size: 28px; }
    h2 { font-size: 18px; margin: 0 0 16px; }
    label { display: block; font-size: 14px; margin: 16px 0 6px; }
    select, textarea, input[type=text] {
      width: 100%; font: inherit; padding: 8px; border: 1px solid #d6d3d1; border-radius: 6px;
    }
    textarea { height: 300px; resize: vertical; }
    button {
      font: inherit; padding: 10px 18px; border: 1px solid #d6d3d1; border-radius: 6px;
      background: white; cursor: pointer;
    }
    button.primary { background: #003366; color: white; border-color: #003366; }
    button:disabled { opacity: 0.5; cursor: wait; }
    .intro { color: #57534e; white-space: pre-line; }
    .credit { text-align: right; color: gray; font-size: 12px; }
    .error { color: #b91c1c; background: #fef2f2; padding: 10px 12px; border-radius: 6px; margin: 12px 0; }
    .hidden { display: none; }
    .progress { height: 8px; background: #e7e5e4; border-radius: 4px; overflow: hidden; margin: 16px 0 4px; }
    .progress > div { height: 100%; width: 0; background: #003366; transition: width 0.3s; }
    .stage { font-size: 13px; color: #78716c; }
    .tabs { display: flex; gap: 4px; margin-top: 24px; border-bottom: 1px solid #d6d3d1; }
    .tabs button { border: none; border-bottom: 3px solid transparent; border-radius: 0; background: none; }
    .tabs button.active { border-bottom-color: #003366; font-weight: 600; }
    .report { padding: 20px 0; }
    .block { white-space: pre-wrap; }
    .answer { background: #eff6ff; padding: 12px; border-radius: 6px; margin-top: 12px; white-space: pre-wrap; }
    .ask { display: flex; gap: 8px; }
  </style>
</head>
<body>
  <aside>
    <h2>환자 메모 입력 &amp; 설정</h2>
    <label for="sample">샘플 메모 선택:</label>
    <select id="sample"><option value="">예시 메모 선택</option></select>
    <label for="note">또는 의사 메모를 직접 입력하세요:</label>
    <textarea id="note"></textarea>
  </aside>

  <main>
    <h1>AI Healthcare Translator</h1>
    <p class="intro">외국인 환자들과 소통하는 데에 도움을 주는 도구.
1. 왼쪽에 의사 메모를 입력하거나 샘플을 선택하세요.
2. 리포트 생성하기를 클릭하세요.</p>
    <p class="credit">Created by Ha-neul Jung | Data source: WHO, CDC, and publicly available medical datasets</p>

    <button id="generate" class="primary">리포트 생성하기</button>
    <div id="error" class="error hidden"></div>

    <div id="progress-wrap" class="hidden">
      <div class="progress"><div id="bar"></div></div>
      <div id="stage" class="stage">생성중...</div>
    </div>

    <div id="results" class="hidden">
      <div class="tabs">
        <button data-tab="english" class="active">English (Patient Version)</button>
        <button data-tab="korean">Korean (Doctor Version)</button>
      </div>

      <section id="tab-english" class="report"></section>
      <section id="tab-korean" class="report hidden"></section>

      <section id="follow-up">
        <h2>Ask a Question About Your Note</h2>
        <div class="ask">
          <input type="text" id="question" placeholder="Type your question here:">
          <button id="ask">Ask AI</button>
        </div>
        <div id="follow-up-error" class="error hidden"></div>
        <div id="answer" class="answer hidden"></div>
      </section>
    </div>
  </main>

  <script>
    const $ = (id) => document.getElementById(id);
    let lastNote = '';
    const downloadUrls = [];

    function showError(el, message) {
      el.textContent = message;
      el.classList.remove('hidden');
    }

    function clearError(el) {
      el.textContent = '';
      el.classList.add('hidden');
    }

    async function readError(resp) {
      try {
        const body = await resp.json();
        return body.error.message;
      } catch (_) {
        return 'Error: ' + resp.status;
      }
    }

    async function loadSamples() {
      const resp = await fetch('/api/samples');
      if (!resp.ok) return;
      const samples = await resp.json();
      const select = $('sample');
      samples.forEach((s, i) => {
        const opt = document.createElement('option');
        opt.value = String(i);
        opt.textContent = s.label;
        select.appendChild(opt);
      });
      select.addEventListener('change', () => {
        const sample = samples[Number(select.value)];
        $('note').value = select.value === '' ? '' : sample.note;
      });
    }

    function setProgress(percent, label) {
      $('bar').style.width = percent + '%';
      $('stage').textContent = label;
    }

    function pdfUrl(base64) {
      const raw = atob(base64);
      const bytes = new Uint8Array(raw.length);
      for (let i = 0; i < raw.length; i++) bytes[i] = raw.charCodeAt(i);
      const url = URL.createObjectURL(new Blob([bytes], { type: 'application/pdf' }));
      downloadUrls.push(url);
      return url;
    }

    function renderReport(target, report) {
      target.innerHTML = '';
      const heading = document.createElement('h2');
      heading.textContent = report.screen_heading;
      target.appendChild(heading);

      // The screen shows the subheader and body only; the PDF carries the rest.
      report.blocks.filter((block) => block.kind === 'body').forEach((block) => {
        const el = document.createElement('p');
        el.className = 'block block-body';
        el.textContent = block.text;
        el.style.color = block.style.color;
        el.style.textAlign = block.style.alignment;
        el.style.fontSize = (block.style.font_size_pt * 1.33) + 'px';
        if (block.style.emphasis === 'bold') el.style.fontWeight = '700';
        if (block.style.emphasis === 'italic') el.style.fontStyle = 'italic';
        target.appendChild(el);
      });

      const link = document.createElement('a');
      link.href = pdfUrl(report.pdf_base64);
      link.download = report.file_name;
      link.textContent = 'Download Full Report (PDF)';
      target.appendChild(link);
    }

    function showResult(output) {
      downloadUrls.splice(0).forEach((u) => URL.revokeObjectURL(u));
      renderReport($('tab-english'), output.english);
      renderReport($('tab-korean'), output.korean);
      clearError($('follow-up-error'));
      $('answer').classList.add('hidden');
      $('results').classList.remove('hidden');
    }

    // Minimal SSE parser over a fetch body; EventSource cannot POST.
    async function streamReport(note, onEvent) {
      const resp = await fetch('/api/reports/stream', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify({ note }),
      });
      if (!resp.ok) throw new Error(await readError(resp));

      const reader = resp.body.getReader();
      const decoder = new TextDecoder();
      let buffer = '';
      for (;;) {
        const { value, done } = await reader.read();
        if (done) break;
        buffer += decoder.decode(value, { stream: true });
        let split;
        while ((split = buffer.indexOf('\n\n')) >= 0) {
          const frame = buffer.slice(0, split);
          buffer = buffer.slice(split + 2);
          let name = 'message';
          const data = [];
          frame.split('\n').forEach((line) => {
            if (line.startsWith('event:')) name = line.slice(6).trim();
            else if (line.startsWith('data:')) data.push(line.slice(5).replace(/^ /, ''));
          });
          if (data.length) onEvent(name, JSON.parse(data.join('\n')));
        }
      }
    }

    async function generate() {
      const note = $('note').value;
      clearError($('error'));
      if (note.trim() === '') {
        showError($('error'), "Doctor's note 를 먼저 기입해주세요.");
        return;
      }

      $('generate').disabled = true;
      $('progress-wrap').classList.remove('hidden');
      setProgress(0, '생성중...');
      try {
        await streamReport(note, (name, payload) => {
          if (name === 'stage') setProgress(payload.percent, payload.label);
          else if (name === 'result') {
            lastNote = note;
            showResult(payload);
          } else if (name === 'error') showError($('error'), 'Error: ' + payload.error.message);
        });
      } catch (e) {
        showError($('error'), e.message);
      } finally {
        $('generate').disabled = false;
        $('progress-wrap').classList.add('hidden');
      }
    }

    async function ask() {
      const question = $('question').value;
      const errorEl = $('follow-up-error');
      clearError(errorEl);
      if (question.trim() === '') {
        showError(errorEl, 'Please enter a question.');
        return;
      }
      $('ask').disabled = true;
      try {
        const resp = await fetch('/api/follow-up', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ note: lastNote, question }),
        });
        if (!resp.ok) throw new Error(await readError(resp));
        const body = await resp.json();
        $('answer').textContent = body.answer;
        $('answer').classList.remove('hidden');
      } catch (e) {
        showError(errorEl, e.message);
      } finally {
        $('ask').disabled = false;
      }
    }

    document.querySelectorAll('.tabs button').forEach((btn) => {
      btn.addEventListener('click', () => {
        document.querySelectorAll('.tabs button').forEach((b) => b.classList.toggle('active', b === btn));
        $('tab-english').classList.toggle('hidden', btn.dataset.tab !== 'english');
        $('tab-korean').classList.toggle('hidden', btn.dataset.tab !== 'korean');
      });
    });
    $('generate').addEventListener('click', generate);
    $('ask').addEventListener('click', ask);
    loadSamples();
  </script>
</body>
</html>"##;
