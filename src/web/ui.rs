use crate::registry::HabitRegistry;

/// Builds the page, injecting one number input per registered habit into the
/// log form.
pub fn render_index(registry: &HabitRegistry) -> String {
    let fields = registry
        .habits()
        .iter()
        .map(|def| {
            format!(
                r#"        <label class="field">{label}
          <input type="number" data-key="{key}" min="0" step="{step}" value="0" />
        </label>"#,
                label = def.label,
                key = def.key,
                step = def.input_step(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    INDEX_HTML.replace("{{HABIT_FIELDS}}", &fields)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Personal Habit Coach</title>
  <style>
    :root {
      --bg: #f6f4ef;
      --ink: #28322c;
      --accent: #2e7d52;
      --accent-soft: #e3efe7;
      --warn: #b3722a;
      --card: #ffffff;
      --line: #4a78b5;
      --target: #c0392b;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      display: flex;
    }

    nav {
      width: 230px;
      min-height: 100vh;
      background: var(--card);
      border-right: 1px solid #e1ded6;
      padding: 24px 16px;
    }

    nav h2 {
      margin: 0 0 16px;
      font-size: 1rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #7a766d;
    }

    nav button {
      display: block;
      width: 100%;
      text-align: left;
      margin-bottom: 8px;
      padding: 10px 12px;
      border: none;
      border-radius: 8px;
      background: transparent;
      color: var(--ink);
      font-size: 0.95rem;
      cursor: pointer;
    }

    nav button:hover {
      background: var(--accent-soft);
    }

    nav button.active {
      background: var(--accent);
      color: white;
    }

    main {
      flex: 1;
      padding: 32px 40px;
      max-width: 900px;
    }

    h1 {
      margin-top: 0;
    }

    .view {
      display: none;
    }

    .view.active {
      display: block;
    }

    .card {
      background: var(--card);
      border: 1px solid #e1ded6;
      border-radius: 12px;
      padding: 20px 24px;
      margin-bottom: 20px;
    }

    .field {
      display: block;
      margin-bottom: 14px;
      font-weight: 600;
    }

    .field input {
      display: block;
      margin-top: 6px;
      padding: 8px 10px;
      width: 220px;
      border: 1px solid #cfccc3;
      border-radius: 6px;
      font-size: 1rem;
    }

    button.primary {
      background: var(--accent);
      color: white;
      border: none;
      border-radius: 8px;
      padding: 10px 20px;
      font-size: 1rem;
      cursor: pointer;
    }

    .status {
      margin-top: 12px;
      font-weight: 600;
      color: var(--accent);
    }

    .status.error {
      color: var(--warn);
    }

    .feedback-line {
      margin: 6px 0;
      font-family: "Consolas", monospace;
      white-space: pre-wrap;
    }

    .chart-card svg {
      width: 100%;
      height: auto;
      background: white;
    }

    .chart-line {
      fill: none;
      stroke: var(--line);
      stroke-width: 2.5;
    }

    .chart-point {
      fill: var(--line);
    }

    .chart-target {
      stroke: var(--target);
      stroke-width: 2;
      stroke-dasharray: 7 5;
    }

    .chart-label {
      font-size: 11px;
      fill: #7a766d;
    }

    .chart-grid {
      stroke: #eceae3;
      stroke-width: 1;
    }

    .vector-entry {
      padding: 8px 0;
      border-bottom: 1px solid #eceae3;
    }

    .vector-entry .id {
      color: #7a766d;
      font-size: 0.85rem;
    }

    .muted {
      color: #7a766d;
    }
  </style>
</head>
<body>
  <nav>
    <h2>Actions</h2>
    <button data-view="log" class="active">Log Habits</button>
    <button data-view="feedback">Simple Feedback</button>
    <button data-view="plot">Plot Progress</button>
    <button data-view="ai">AI Feedback</button>
    <button data-view="data">View Stored Data</button>
  </nav>
  <main>
    <h1>Personal Habit Coach</h1>

    <section id="view-log" class="view active">
      <div class="card">
        <h3>Log today's habits</h3>
        <form id="log-form">
{{HABIT_FIELDS}}
          <button type="submit" class="primary">Save</button>
        </form>
        <div id="log-status" class="status"></div>
      </div>
    </section>

    <section id="view-feedback" class="view">
      <div class="card" id="feedback-card">
        <p class="muted">Loading…</p>
      </div>
    </section>

    <section id="view-plot" class="view">
      <div id="charts"></div>
    </section>

    <section id="view-ai" class="view">
      <div class="card" id="ai-card">
        <p class="muted">Loading…</p>
      </div>
    </section>

    <section id="view-data" class="view">
      <div class="card" id="data-card">
        <p class="muted">Loading…</p>
      </div>
    </section>
  </main>

  <script>
    const views = document.querySelectorAll('.view');
    const buttons = document.querySelectorAll('nav button');

    const show = (name) => {
      views.forEach((v) => v.classList.toggle('active', v.id === `view-${name}`));
      buttons.forEach((b) => b.classList.toggle('active', b.dataset.view === name));
      if (name === 'feedback') loadFeedback();
      if (name === 'plot') loadCharts();
      if (name === 'ai') loadSummary();
      if (name === 'data') loadVectors();
    };

    buttons.forEach((b) => b.addEventListener('click', () => show(b.dataset.view)));

    document.getElementById('log-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const status = document.getElementById('log-status');
      const values = {};
      document.querySelectorAll('#log-form input[data-key]').forEach((input) => {
        values[input.dataset.key] = Number(input.value);
      });
      try {
        const res = await fetch('/api/log', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ values })
        });
        if (!res.ok) {
          throw new Error(await res.text());
        }
        const data = await res.json();
        status.classList.remove('error');
        status.textContent = `${data.message} (${data.date})`;
      } catch (err) {
        status.classList.add('error');
        status.textContent = err.message;
      }
    });

    const loadFeedback = async () => {
      const card = document.getElementById('feedback-card');
      const res = await fetch('/api/feedback');
      if (!res.ok) {
        card.innerHTML = `<p class="status error">${await res.text()}</p>`;
        return;
      }
      const data = await res.json();
      if (data.message) {
        card.innerHTML = `<p class="muted">${data.message}</p>`;
        return;
      }
      const lines = data.lines
        .map((line) => `<p class="feedback-line">${line}</p>`)
        .join('');
      card.innerHTML = `<h3>${data.heading}</h3>${lines}`;
    };

    // Splits a value sequence into runs of consecutive present values so the
    // drawn line never bridges a missing day.
    const splitSegments = (values) => {
      const segments = [];
      let current = [];
      values.forEach((value, index) => {
        if (value === null || value === undefined) {
          if (current.length) segments.push(current);
          current = [];
        } else {
          current.push({ index, value });
        }
      });
      if (current.length) segments.push(current);
      return segments;
    };

    const renderChart = (series, dates) => {
      const width = 640;
      const height = 280;
      const padX = 48;
      const padY = 36;

      let min = series.target;
      let max = series.target;
      series.values.forEach((v) => {
        if (v !== null && v !== undefined) {
          min = Math.min(min, v);
          max = Math.max(max, v);
        }
      });
      if (min === max) {
        min -= 1;
        max += 1;
      }
      const range = max - min;
      const span = Math.max(dates.length - 1, 1);
      const x = (i) => padX + (i * (width - padX * 2)) / span;
      const y = (v) => height - padY - ((v - min) * (height - padY * 2)) / range;

      let body = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = min + (range * i) / 4;
        const yPos = y(value);
        body += `<line class="chart-grid" x1="${padX}" y1="${yPos}" x2="${width - padX}" y2="${yPos}" />`;
        body += `<text class="chart-label" x="${padX - 8}" y="${yPos + 4}" text-anchor="end">${value.toFixed(1)}</text>`;
      }

      splitSegments(series.values).forEach((segment) => {
        const path = segment
          .map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(p.index).toFixed(1)} ${y(p.value).toFixed(1)}`)
          .join(' ');
        body += `<path class="chart-line" d="${path}" />`;
        segment.forEach((p) => {
          body += `<circle class="chart-point" cx="${x(p.index)}" cy="${y(p.value)}" r="4" />`;
        });
      });

      const targetY = y(series.target);
      body += `<line class="chart-target" x1="${padX}" y1="${targetY}" x2="${width - padX}" y2="${targetY}" />`;
      body += `<text class="chart-label" x="${width - padX}" y="${targetY - 6}" text-anchor="end">Target ${series.target}</text>`;

      const labelEvery = Math.max(1, Math.ceil(dates.length / 8));
      dates.forEach((date, i) => {
        if (i % labelEvery !== 0) return;
        body += `<text class="chart-label" x="${x(i)}" y="${height - padY + 18}" text-anchor="middle">${date.slice(5)}</text>`;
      });

      return `<div class="card chart-card"><h3>${series.label} Over Time</h3>` +
        `<svg viewBox="0 0 ${width} ${height}">${body}</svg></div>`;
    };

    const loadCharts = async () => {
      const container = document.getElementById('charts');
      const res = await fetch('/api/series');
      if (!res.ok) {
        container.innerHTML = `<div class="card"><p class="status error">${await res.text()}</p></div>`;
        return;
      }
      const data = await res.json();
      if (!data.dates.length) {
        container.innerHTML = '<div class="card"><p class="muted">No data to plot yet.</p></div>';
        return;
      }
      container.innerHTML = data.series
        .map((series) => renderChart(series, data.dates))
        .join('');
    };

    const loadSummary = async () => {
      const card = document.getElementById('ai-card');
      card.innerHTML = '<p class="muted">Asking the coach…</p>';
      const res = await fetch('/api/summary');
      if (!res.ok) {
        card.innerHTML = `<p class="status error">${await res.text()}</p>`;
        return;
      }
      const data = await res.json();
      if (data.message) {
        card.innerHTML = `<p class="muted">${data.message}</p>`;
        return;
      }
      card.innerHTML = `<h3>AI Coach Feedback</h3><p class="feedback-line">${data.text}</p>`;
    };

    const loadVectors = async () => {
      const card = document.getElementById('data-card');
      const res = await fetch('/api/vectors');
      if (!res.ok) {
        card.innerHTML = `<p class="status error">${await res.text()}</p>`;
        return;
      }
      const entries = await res.json();
      if (!entries.length) {
        card.innerHTML = '<p class="muted">No data stored yet.</p>';
        return;
      }
      card.innerHTML = '<h3>Stored Entries</h3>' + entries
        .map((e, i) => `<div class="vector-entry"><strong>${i + 1}.</strong> ${e.text} <span class="id">(ID: ${e.id})</span></div>`)
        .join('');
    };
  </script>
</body>
</html>
"#;
