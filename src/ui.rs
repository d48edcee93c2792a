use crate::models::{SummaryResponse, TotalsResponse};

pub fn render_index(summary: &SummaryResponse) -> String {
    let updated = summary
        .updated
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    INDEX_HTML
        .replace("{{UPDATED}}", &updated)
        .replace("{{GLOBAL_TILES}}", &render_tiles(&summary.global))
        .replace("{{HEADLINE_TILES}}", &render_tiles(&summary.headline))
}

fn render_tiles(totals: &TotalsResponse) -> String {
    let label = escape(&totals.label);
    [
        ("confirmed", "Confirmed", totals.confirmed.to_string()),
        ("deaths", "Deaths", totals.deaths.to_string()),
        ("recovered", "Recovered", totals.recovered.to_string()),
        ("rate", "Recovery rate", format_rate(totals.recovery_rate)),
    ]
    .iter()
    .map(|(class, title, value)| {
        format!(
            r#"<div class="stat"><span class="label">{title} · {label}</span><span class="value {class}">{value}</span></div>"#
        )
    })
    .collect()
}

/// Percentage with two decimals, or "N/A" when the rate is undefined.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.2}%", rate * 100.0),
        None => "N/A".to_string(),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Outbreak Dashboard</title>
  <style>
    :root {
      --bg: #f4f4f2;
      --ink: #1e1e1e;
      --muted: #6b6b6b;
      --card: #ffffff;
      --confirmed: #d9822b;
      --deaths: #c23030;
      --recovered: #1f7a4d;
      --bar: #2f4858;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Helvetica Neue", Arial, sans-serif;
    }

    header {
      background: var(--ink);
      color: white;
      text-align: center;
      padding: 24px 16px;
    }

    header h1 {
      margin: 0 0 6px;
      font-size: 1.8rem;
    }

    header p {
      margin: 0;
      color: #cfcfcf;
    }

    main {
      width: min(1100px, 100%);
      margin: 0 auto;
      padding: 24px 16px 48px;
      display: grid;
      gap: 24px;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 12px;
    }

    .stat {
      background: var(--card);
      border-radius: 12px;
      padding: 14px 16px;
      display: grid;
      gap: 6px;
      border: 1px solid rgba(0, 0, 0, 0.06);
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    .value.confirmed { color: var(--confirmed); }
    .value.deaths { color: var(--deaths); }
    .value.recovered { color: var(--recovered); }

    .tabs {
      display: flex;
      flex-wrap: wrap;
      border-bottom: 1px solid #d6d6d6;
    }

    .tab {
      appearance: none;
      border: none;
      background: transparent;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      color: var(--muted);
    }

    .tab.active {
      background: var(--ink);
      color: white;
    }

    .card {
      background: var(--card);
      border-radius: 12px;
      padding: 16px;
      border: 1px solid rgba(0, 0, 0, 0.06);
    }

    .card h2 {
      margin: 0 0 12px;
      font-size: 1.2rem;
    }

    svg {
      width: 100%;
      display: block;
    }

    .axis-label {
      fill: var(--muted);
      font-size: 11px;
    }

    .grid-line {
      stroke: rgba(0, 0, 0, 0.08);
    }

    .legend {
      display: flex;
      gap: 16px;
      font-size: 0.9rem;
      margin-top: 8px;
    }

    .legend span::before {
      content: "";
      display: inline-block;
      width: 10px;
      height: 10px;
      border-radius: 50%;
      margin-right: 6px;
      background: currentColor;
    }

    .status {
      color: var(--deaths);
      min-height: 1.2em;
    }
  </style>
</head>
<body>
  <header>
    <h1>Outbreak Dashboard</h1>
    <p>Cumulative cases since 22 January 2020 · data up to {{UPDATED}}</p>
  </header>

  <main>
    <section class="panel">{{GLOBAL_TILES}}</section>
    <section class="panel">{{HEADLINE_TILES}}</section>

    <section class="card">
      <h2>Reported cases</h2>
      <svg id="map" viewBox="0 0 720 360" role="img" aria-label="Case map"></svg>
    </section>

    <nav class="tabs" id="tabs" role="tablist"></nav>
    <section class="panel" id="location-tiles"></section>

    <section class="card">
      <h2 id="trend-title">Evolution</h2>
      <svg id="trend" viewBox="0 0 720 300" role="img" aria-label="Cumulative cases"></svg>
      <div class="legend">
        <span style="color: var(--confirmed)">Confirmed</span>
        <span style="color: var(--deaths)">Deaths</span>
        <span style="color: var(--recovered)">Recovered</span>
      </div>
    </section>

    <section class="card">
      <h2 id="daily-title">New confirmed cases per day</h2>
      <svg id="daily" viewBox="0 0 720 240" role="img" aria-label="Daily new cases"></svg>
    </section>

    <section class="card">
      <h2 id="regions-title">Cases by region</h2>
      <svg id="regions" viewBox="0 0 720 300" role="img" aria-label="Cases by region"></svg>
    </section>

    <section class="card">
      <h2 id="high-title">Most affected countries</h2>
      <svg id="high" viewBox="0 0 720 300" role="img" aria-label="Most affected countries"></svg>
    </section>

    <section class="card">
      <h2 id="low-title">Least affected countries</h2>
      <svg id="low" viewBox="0 0 720 300" role="img" aria-label="Least affected countries"></svg>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const statusEl = document.getElementById('status');
    const tabsEl = document.getElementById('tabs');
    const tilesEl = document.getElementById('location-tiles');

    const fetchJson = async (path) => {
      const res = await fetch(path);
      if (!res.ok) {
        throw new Error(`${path}: ${res.status}`);
      }
      return res.json();
    };

    const escapeText = (text) =>
      String(text).replace(/[&<>"]/g, (c) => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;' })[c]);

    const formatCount = (value) => Number(value).toLocaleString('en-US');

    const formatRate = (rate) => (rate === null || rate === undefined ? 'N/A' : `${(rate * 100).toFixed(2)}%`);

    const renderTiles = (totals) => {
      const tiles = [
        ['confirmed', 'Confirmed', formatCount(totals.confirmed)],
        ['deaths', 'Deaths', formatCount(totals.deaths)],
        ['recovered', 'Recovered', formatCount(totals.recovered)],
        ['rate', 'Recovery rate', formatRate(totals.recovery_rate)],
      ];
      tilesEl.innerHTML = tiles
        .map(([cls, title, value]) =>
          `<div class="stat"><span class="label">${title} · ${escapeText(totals.label)}</span><span class="value ${cls}">${value}</span></div>`)
        .join('');
    };

    const renderLines = (svg, dates, series) => {
      const width = 720;
      const height = 300;
      const left = 64;
      const right = 16;
      const top = 16;
      const bottom = 32;
      if (!dates.length) {
        svg.innerHTML = '<text class="axis-label" x="50%" y="50%" text-anchor="middle">No data</text>';
        return;
      }
      const max = Math.max(1, ...series.flatMap((s) => s.values));
      const x = (i) => left + (dates.length > 1 ? (i * (width - left - right)) / (dates.length - 1) : 0);
      const y = (v) => height - bottom - (v / max) * (height - top - bottom);

      let out = '';
      for (let i = 0; i <= 4; i += 1) {
        const value = (max * i) / 4;
        out += `<line class="grid-line" x1="${left}" x2="${width - right}" y1="${y(value)}" y2="${y(value)}" />`;
        out += `<text class="axis-label" x="${left - 8}" y="${y(value) + 4}" text-anchor="end">${formatCount(Math.round(value))}</text>`;
      }
      const step = Math.max(1, Math.ceil(dates.length / 8));
      dates.forEach((date, i) => {
        if (i % step === 0) {
          out += `<text class="axis-label" x="${x(i)}" y="${height - 10}" text-anchor="middle">${date.slice(5)}</text>`;
        }
      });
      series.forEach((s) => {
        const path = s.values.map((v, i) => `${i === 0 ? 'M' : 'L'}${x(i).toFixed(1)},${y(v).toFixed(1)}`).join(' ');
        out += `<path d="${path}" fill="none" stroke="${s.color}" stroke-width="2" />`;
      });
      svg.innerHTML = out;
    };

    const renderBars = (svg, items, color) => {
      const width = 720;
      const height = Number(svg.getAttribute('viewBox').split(' ')[3]);
      const left = 64;
      const bottom = 80;
      const top = 12;
      if (!items.length) {
        svg.innerHTML = '<text class="axis-label" x="50%" y="50%" text-anchor="middle">No data</text>';
        return;
      }
      const max = Math.max(1, ...items.map((item) => item.value));
      const slot = (width - left) / items.length;
      const barWidth = Math.max(2, slot * 0.7);
      svg.innerHTML = items
        .map((item, i) => {
          const h = Math.max(0, (item.value / max) * (height - top - bottom));
          const x = left + i * slot + (slot - barWidth) / 2;
          const y = height - bottom - h;
          const labelX = x + barWidth / 2;
          return `<rect x="${x}" y="${y}" width="${barWidth}" height="${h}" fill="${color}"><title>${escapeText(item.label)}: ${formatCount(item.value)}</title></rect>` +
            `<text class="axis-label" transform="translate(${labelX},${height - bottom + 8}) rotate(60)">${escapeText(item.label)}</text>`;
        })
        .join('');
    };

    const renderMap = (points) => {
      const svg = document.getElementById('map');
      const x = (long) => ((long + 180) / 360) * 720;
      const y = (lat) => ((90 - lat) / 180) * 360;
      svg.innerHTML = '<rect width="720" height="360" fill="#e8eef2" />' + points
        .map((p) => {
          const r = Math.sqrt(p.cases / 30) / 4 + 2;
          const place = p.state ? `${p.state}, ${p.country}` : p.country;
          return `<circle cx="${x(p.long).toFixed(1)}" cy="${y(p.lat).toFixed(1)}" r="${r.toFixed(1)}" fill="rgba(194,48,48,0.6)"><title>${escapeText(place)}: ${formatCount(p.cases)}</title></circle>`;
        })
        .join('');
    };

    const showLocation = async (key) => {
      Array.from(tabsEl.children).forEach((tab) => {
        const active = tab.dataset.key === key;
        tab.classList.toggle('active', active);
        tab.setAttribute('aria-selected', String(active));
      });
      const data = await fetchJson(`/api/locations/${encodeURIComponent(key)}`);
      renderTiles(data.totals);
      document.getElementById('trend-title').textContent = `Evolution · ${data.totals.label}`;
      document.getElementById('daily-title').textContent = `New confirmed cases per day · ${data.totals.label}`;
      renderLines(document.getElementById('trend'), data.dates, [
        { values: data.confirmed.cumulative, color: '#d9822b' },
        { values: data.deaths.cumulative, color: '#c23030' },
        { values: data.recovered.cumulative, color: '#1f7a4d' },
      ]);
      renderBars(
        document.getElementById('daily'),
        data.dates.map((date, i) => ({ label: date, value: data.confirmed.daily[i] })),
        '#d9822b',
      );
    };

    const init = async () => {
      const [locations, countries, regions, points] = await Promise.all([
        fetchJson('/api/locations'),
        fetchJson('/api/countries'),
        fetchJson('/api/regions'),
        fetchJson('/api/map'),
      ]);

      tabsEl.innerHTML = locations
        .map((loc) => `<button class="tab" type="button" role="tab" data-key="${escapeText(loc.key)}">${escapeText(loc.label)}</button>`)
        .join('');
      tabsEl.addEventListener('click', (event) => {
        const key = event.target.dataset && event.target.dataset.key;
        if (key) {
          showLocation(key).catch((err) => { statusEl.textContent = err.message; });
        }
      });

      renderMap(points);
      document.getElementById('regions-title').textContent = `Cases by region · ${regions.country}`;
      renderBars(document.getElementById('regions'), regions.regions.map((r) => ({ label: r.region, value: r.cases })), '#2f4858');
      document.getElementById('high-title').textContent =
        `Countries above ${formatCount(countries.upper_threshold)} cases (excluding ${countries.excluded_country})`;
      renderBars(document.getElementById('high'), countries.high_infection.map((c) => ({ label: c.country, value: c.cases })), '#c23030');
      document.getElementById('low-title').textContent = `Countries below ${formatCount(countries.lower_threshold)} cases`;
      renderBars(document.getElementById('low'), countries.low_infection.map((c) => ({ label: c.country, value: c.cases })), '#1f7a4d');

      if (locations.length) {
        await showLocation(locations[0].key);
      }
    };

    init().catch((err) => {
      statusEl.textContent = `Could not load dashboard data: ${err.message}`;
    });
  </script>
</body>
</html>
"##;
