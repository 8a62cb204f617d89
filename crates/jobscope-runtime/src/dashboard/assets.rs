use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// CSS styles.
pub async fn styles_css() -> Response {
    let css = r#"
:root {
    --bg-primary: #0f0f0f;
    --bg-secondary: #1a1a1a;
    --bg-tertiary: #252525;
    --text-primary: #ffffff;
    --text-secondary: #a0a0a0;
    --accent: #3b82f6;
    --accent-hover: #2563eb;
    --error: #ef4444;
    --border: #333;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg-primary);
    color: var(--text-primary);
    line-height: 1.6;
}

a {
    color: var(--accent);
}

.dashboard {
    display: flex;
    min-height: 100vh;
}

/* Sidebar */
.sidebar {
    width: 240px;
    background: var(--bg-secondary);
    border-right: 1px solid var(--border);
    display: flex;
    flex-direction: column;
    position: fixed;
    height: 100vh;
}

.sidebar-header {
    padding: 20px;
    border-bottom: 1px solid var(--border);
}

.sidebar-header h1 {
    font-size: 1.25rem;
    font-weight: 700;
}

.sidebar-header .version {
    font-size: 0.75rem;
    color: var(--text-secondary);
}

.nav-links {
    list-style: none;
    padding: 10px 0;
    flex: 1;
}

.nav-links li a {
    display: block;
    padding: 12px 20px;
    color: var(--text-secondary);
    text-decoration: none;
    transition: all 0.2s;
}

.nav-links li a:hover,
.nav-links li a.active {
    background: var(--bg-tertiary);
    color: var(--text-primary);
    border-left: 3px solid var(--accent);
}

/* Main Content */
.content {
    margin-left: 240px;
    flex: 1;
    min-height: 100vh;
}

.content-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 20px 30px;
    background: var(--bg-secondary);
    border-bottom: 1px solid var(--border);
    position: sticky;
    top: 0;
    z-index: 100;
}

.content-header h2 {
    font-size: 1.5rem;
    font-weight: 600;
}

.header-actions {
    display: flex;
    align-items: center;
    gap: 10px;
}

.last-refresh {
    font-size: 0.75rem;
    color: var(--text-secondary);
}

.content-body {
    padding: 30px;
}

/* Panels */
.panels-row {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(400px, 1fr));
    gap: 20px;
    margin-bottom: 30px;
}

.panel,
.chart-container {
    background: var(--bg-secondary);
    border-radius: 8px;
    padding: 20px;
    border: 1px solid var(--border);
    margin-bottom: 20px;
}

.panel h3,
.chart-container h3 {
    font-size: 1rem;
    margin-bottom: 15px;
    color: var(--text-secondary);
}

.panel-state {
    font-size: 0.875rem;
    color: var(--text-secondary);
    margin-bottom: 10px;
}

.panel-state[data-state="error"] {
    color: var(--error);
}

.empty-state {
    color: var(--text-secondary);
    font-size: 0.875rem;
}

.project-facts {
    display: grid;
    grid-template-columns: max-content 1fr;
    gap: 6px 20px;
}

.project-facts dt {
    color: var(--text-secondary);
}

.project-facts ul {
    list-style: none;
}

/* Plot */
.chart-container canvas {
    width: 100%;
    height: 260px;
    cursor: pointer;
}

.plot-legend {
    list-style: none;
    display: flex;
    gap: 20px;
    font-size: 0.875rem;
    margin-top: 10px;
}

.plot-legend .swatch {
    display: inline-block;
    width: 12px;
    height: 12px;
    margin-right: 6px;
    vertical-align: middle;
}

.tooltip {
    position: absolute;
    padding: 4px 8px;
    border-radius: 4px;
    background: var(--bg-tertiary);
    border: 1px solid var(--border);
    font-size: 0.75rem;
    pointer-events: none;
    z-index: 200;
}

/* Buttons */
.btn {
    padding: 8px 16px;
    border-radius: 6px;
    border: none;
    cursor: pointer;
    font-size: 0.875rem;
    transition: all 0.2s;
}

.btn-secondary {
    background: var(--bg-tertiary);
    color: var(--text-primary);
    border: 1px solid var(--border);
}

.btn-secondary:hover {
    background: var(--border);
}

/* Tables */
table {
    width: 100%;
    border-collapse: collapse;
}

th, td {
    padding: 10px 12px;
    text-align: left;
    border-bottom: 1px solid var(--border);
    font-size: 0.875rem;
}

th {
    font-weight: 600;
    color: var(--text-secondary);
    font-size: 0.75rem;
    text-transform: uppercase;
    cursor: pointer;
    user-select: none;
}

th.sorted-asc::after { content: " \25B2"; }
th.sorted-desc::after { content: " \25BC"; }

tbody tr {
    cursor: pointer;
}

tbody tr:hover {
    background: var(--bg-tertiary);
}

tr.selected {
    background: var(--bg-tertiary);
}

tr.detail-row td {
    background: var(--bg-primary);
    font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
    font-size: 0.75rem;
    white-space: normal;
    cursor: default;
}

tr.detail-row pre {
    white-space: pre-wrap;
}

@media (max-width: 900px) {
    .sidebar {
        display: none;
    }

    .content {
        margin-left: 0;
    }

    .panels-row {
        grid-template-columns: 1fr;
    }
}
"#;

    (StatusCode::OK, [(header::CONTENT_TYPE, "text/css")], css).into_response()
}

/// Main JavaScript.
pub async fn main_js() -> Response {
    let js = r#"
// jobscope dashboard

const NA = '<i>N/A</i>';

// Which job service documents the overview page is showing.
const view = {
    dailyUrl: null,
    chartUrl: null,
    jobsUrl: null,
    chart: null,
    plot: null,
};

document.addEventListener('DOMContentLoaded', function() {
    initDashboard();

    const refreshSecs = Number(document.body.dataset.refreshSecs) || 60;
    setInterval(refreshData, refreshSecs * 1000);
});

function initDashboard() {
    setupEventHandlers();
    refreshData();
}

function setupEventHandlers() {
    const refreshBtn = document.getElementById('refresh-btn');
    if (refreshBtn) {
        refreshBtn.addEventListener('click', refreshData);
    }

    document.querySelectorAll('.data-table th[data-key]').forEach(th => {
        th.addEventListener('click', () => sortTable(th.closest('table'), th.dataset.key));
    });

    onRowClick('jobs-table', toggleJobOutput);
    onRowClick('failures-table', selectFailure);
    onRowClick('failed-jobs-table', toggleFailedJobOutput);

    const canvas = document.getElementById('overview-plot');
    if (canvas && window.JobPlot) {
        view.plot = new JobPlot(canvas, document.getElementById('plot-legend'));
        canvas.addEventListener('mousemove', showPlotTooltip);
        canvas.addEventListener('mouseleave', hideTooltip);
        canvas.addEventListener('click', handlePlotClick);
    }
}

function onRowClick(tableId, handler) {
    const table = document.getElementById(tableId);
    if (!table) return;
    table.querySelector('tbody').addEventListener('click', event => {
        if (event.target.closest('a')) return;
        const tr = event.target.closest('tr');
        if (!tr || tr.classList.contains('detail-row')) return;
        handler(table, tr, table.rows_[Number(tr.dataset.index)]);
    });
}

// ============================================================================
// Fetching
// ============================================================================

async function fetchApi(url) {
    const response = await fetch(url);
    let body;
    try {
        body = await response.json();
    } catch (error) {
        throw new Error(response.status + ' ' + response.statusText);
    }
    if (!body.success) {
        throw new Error(body.error || response.statusText);
    }
    return body.data;
}

function withUrl(path, url) {
    return path + '?url=' + encodeURIComponent(url);
}

function setState(panel, state, message) {
    const el = panel && panel.querySelector('.panel-state');
    if (!el) return;
    el.dataset.state = state;
    el.textContent = message || '';
    el.hidden = state === 'success';
}

// Run `loader`, reflecting loading, error and success on `panel`.
async function loadPanel(panel, loader) {
    setState(panel, 'loading', 'Loading...');
    try {
        await loader();
        setState(panel, 'success');
    } catch (error) {
        console.error('Failed to load panel:', error);
        setState(panel, 'error', 'Failed to load: ' + error.message);
    }
}

async function refreshData() {
    const tasks = [];

    if (document.getElementById('projects-table')) {
        tasks.push(loadTable('projects-table', '/api/projects'));
    }
    if (document.getElementById('project-header')) {
        tasks.push(loadOverview());
    }
    if (document.getElementById('failures-table')) {
        tasks.push(loadTable('failures-table', currentSource('failures-table')));
    }

    await Promise.all(tasks);

    const stamp = document.getElementById('last-refresh');
    if (stamp) {
        stamp.textContent = 'Updated ' + new Date().toLocaleTimeString();
    }
}

function currentSource(tableId) {
    return document.getElementById(tableId).dataset.source;
}

function projectName() {
    const el = document.querySelector('[data-project]');
    return el ? el.dataset.project : null;
}

// ============================================================================
// Project overview
// ============================================================================

async function loadOverview() {
    const header = document.getElementById('project-header');
    let loaded = false;

    await loadPanel(header, async () => {
        const data = await fetchApi('/api/projects/' + encodeURIComponent(projectName()));
        header.querySelectorAll('[data-field]').forEach(el => {
            el.innerHTML = data[el.dataset.field] ?? NA;
        });
        view.dailyUrl = data.chart_url;
        view.chartUrl = view.chartUrl || data.chart_url;
        view.jobsUrl = view.jobsUrl || data.jobs_url;
        loaded = true;
    });

    if (loaded) {
        await Promise.all([loadChart(), loadJobs()]);
    }
}

async function loadChart() {
    const canvas = document.getElementById('overview-plot');
    if (!canvas || !view.chartUrl) return;

    await loadPanel(canvas.closest('.chart-container'), async () => {
        view.chart = await fetchApi(withUrl('/api/chart', view.chartUrl));
        if (view.plot) {
            view.plot.draw(view.chart);
        }
    });
}

async function loadJobs() {
    if (!view.jobsUrl) return;
    await loadTable('jobs-table', withUrl('/api/jobs', view.jobsUrl));
}

function runAction(action) {
    switch (action.kind) {
        case 'drill':
            view.jobsUrl = action.jobs_url;
            loadJobs();
            if (action.zoom_url) {
                view.chartUrl = action.zoom_url;
                loadChart();
            }
            break;
        case 'reset_zoom':
            view.chartUrl = view.dailyUrl;
            loadChart();
            break;
        default:
            break;
    }
}

function plotHit(event) {
    if (!view.plot || !view.chart) return null;
    const hit = view.plot.hitTest(event);
    return hit ? view.chart.series[hit.series].points[hit.point] : null;
}

function handlePlotClick(event) {
    if (!view.chart) return;
    const point = plotHit(event);
    runAction(point ? point.action : view.chart.background_action);
}

function showPlotTooltip(event) {
    const point = plotHit(event);
    if (!point) {
        hideTooltip();
        return;
    }
    const tooltip = document.getElementById('tooltip');
    tooltip.textContent = point.tooltip;
    tooltip.style.left = (event.pageX + 10) + 'px';
    tooltip.style.top = (event.pageY + 10) + 'px';
    tooltip.hidden = false;
}

function hideTooltip() {
    const tooltip = document.getElementById('tooltip');
    if (tooltip) tooltip.hidden = true;
}

async function toggleJobOutput(table, tr, row) {
    if (closeDetail(tr)) return;
    if (!row.output_url) {
        openDetail(tr, NA);
        return;
    }
    const detail = openDetail(tr, 'Loading...');
    try {
        const data = await fetchApi(withUrl('/api/output', row.output_url));
        detail.innerHTML = data.html;
    } catch (error) {
        detail.textContent = 'Failed to load output: ' + error.message;
    }
}

// ============================================================================
// Failures
// ============================================================================

async function selectFailure(table, tr, row) {
    const project = encodeURIComponent(projectName());
    const jobsTable = document.getElementById('failed-jobs-table');
    const hint = document.getElementById('failed-jobs-hint');

    if (closeDetail(tr)) {
        tr.classList.remove('selected');
        return;
    }
    table.querySelectorAll('tr.selected').forEach(el => {
        el.classList.remove('selected');
        closeDetail(el);
    });
    tr.classList.add('selected');

    const detail = openDetail(tr, 'Loading...');
    await loadPanel(jobsTable.closest('.panel'), async () => {
        try {
            const data = await fetchApi('/api/projects/' + project + '/failures/' + row.row);
            detail.innerHTML = data.common_lines;
            renderTable(jobsTable, data.jobs);
            if (hint) hint.hidden = true;
        } catch (error) {
            detail.textContent = 'Failed to load: ' + error.message;
            throw error;
        }
    });
}

async function toggleFailedJobOutput(table, tr, row) {
    if (closeDetail(tr)) return;
    const project = encodeURIComponent(projectName());
    const detail = openDetail(tr, 'Loading...');
    try {
        const data = await fetchApi(
            '/api/projects/' + project + '/jobs/' + encodeURIComponent(row.id) + '/output'
        );
        detail.innerHTML = data.html;
    } catch (error) {
        detail.textContent = 'Failed to load output: ' + error.message;
    }
}

// ============================================================================
// Tables
// ============================================================================

const CELL_FORMATTERS = {
    'projects-table': {
        name: (value, row) => `<a href="${row.details_url}">${value}</a>`,
    },
    'jobs-table': {
        level2_url: value => value ? `<a href="${value}" target="_blank">Level2 data</a>` : NA,
    },
};

async function loadTable(tableId, source) {
    const table = document.getElementById(tableId);
    if (!table || !source) return;

    await loadPanel(table.closest('.panel'), async () => {
        renderTable(table, await fetchApi(source));
    });
}

function renderTable(table, rows) {
    table.rows_ = rows;
    if (table.sortKey) {
        sortRows(table);
    }
    drawRows(table);
}

function drawRows(table) {
    const keys = Array.from(table.querySelectorAll('th[data-key]')).map(th => th.dataset.key);
    const formatters = CELL_FORMATTERS[table.id] || {};
    const tbody = table.querySelector('tbody');

    if (table.rows_.length === 0) {
        tbody.innerHTML = `<tr class="detail-row"><td colspan="${keys.length}" class="empty-state">No data</td></tr>`;
        return;
    }

    tbody.innerHTML = table.rows_.map((row, index) => {
        const cells = keys.map(key => {
            const format = formatters[key];
            const value = row[key] ?? NA;
            return `<td>${format ? format(row[key], row) : value}</td>`;
        });
        return `<tr data-index="${index}">${cells.join('')}</tr>`;
    }).join('');
}

function sortTable(table, key) {
    if (!table.rows_) return;
    table.sortDesc = table.sortKey === key ? !table.sortDesc : false;
    table.sortKey = key;

    table.querySelectorAll('th[data-key]').forEach(th => {
        th.classList.remove('sorted-asc', 'sorted-desc');
        if (th.dataset.key === key) {
            th.classList.add(table.sortDesc ? 'sorted-desc' : 'sorted-asc');
        }
    });

    sortRows(table);
    drawRows(table);
}

function sortRows(table) {
    const key = table.sortKey;
    const direction = table.sortDesc ? -1 : 1;
    table.rows_.sort((a, b) => direction * compareCells(a[key], b[key]));
}

function compareCells(a, b) {
    const missing = v => v === null || v === undefined || v === NA;
    if (missing(a) || missing(b)) {
        return missing(a) - missing(b);
    }
    const x = parseFloat(a);
    const y = parseFloat(b);
    if (!isNaN(x) && !isNaN(y) && String(x) === String(a).replace(/s$/, '')) {
        return x - y;
    }
    return String(a).localeCompare(String(b));
}

function closeDetail(tr) {
    const next = tr.nextElementSibling;
    if (next && next.classList.contains('detail-row')) {
        next.remove();
        return true;
    }
    return false;
}

function openDetail(tr, html) {
    const detail = document.createElement('tr');
    detail.className = 'detail-row';
    const cell = document.createElement('td');
    cell.colSpan = tr.children.length;
    cell.innerHTML = html;
    detail.appendChild(cell);
    tr.after(detail);
    return cell;
}
"#;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        js,
    )
        .into_response()
}

/// Bar plot of job activity, drawn on a canvas.
pub async fn plot_js() -> Response {
    let js = r#"
(function(global) {
    const PADDING = { top: 10, right: 10, bottom: 30, left: 50 };
    const AXIS_COLOR = '#333';
    const LABEL_COLOR = '#a0a0a0';

    function JobPlot(canvas, legend) {
        this.canvas = canvas;
        this.ctx = canvas.getContext('2d');
        this.legend = legend;
        this.bars = [];
    }

    JobPlot.prototype.draw = function(view) {
        const ctx = this.ctx;
        const width = this.canvas.width;
        const height = this.canvas.height;
        this.bars = [];
        ctx.clearRect(0, 0, width, height);
        this.drawLegend(view);

        const points = view.series.flatMap(series => series.points);
        if (points.length === 0) {
            ctx.fillStyle = LABEL_COLOR;
            ctx.textAlign = 'center';
            ctx.fillText('No jobs in this period', width / 2, height / 2);
            return;
        }

        // Bars of one period sit side by side, in series order.
        const barWidth = view.bar_width_ms;
        const groupWidth = view.series.length * barWidth;
        const minX = Math.min(...points.map(p => p.x));
        const maxX = Math.max(...points.map(p => p.x)) + groupWidth;
        const maxY = Math.max(1, ...points.map(p => p.y)) * 1.1;

        const plotWidth = width - PADDING.left - PADDING.right;
        const plotHeight = height - PADDING.top - PADDING.bottom;
        const toX = x => PADDING.left + (x - minX) / (maxX - minX) * plotWidth;
        const toY = y => PADDING.top + plotHeight - y / maxY * plotHeight;

        this.drawAxes(view, toX, toY, maxY);

        view.series.forEach((series, s) => {
            ctx.fillStyle = series.color;
            series.points.forEach((point, p) => {
                const left = toX(point.x + (series.order - 1) * barWidth);
                const right = toX(point.x + series.order * barWidth);
                const top = toY(point.y);
                const bottom = toY(0);
                ctx.fillRect(left, top, Math.max(1, right - left), bottom - top);
                this.bars.push({ series: s, point: p, left, right, top, bottom });
            });
        });
    };

    JobPlot.prototype.drawAxes = function(view, toX, toY, maxY) {
        const ctx = this.ctx;
        const bottom = toY(0);

        ctx.strokeStyle = AXIS_COLOR;
        ctx.fillStyle = LABEL_COLOR;
        ctx.font = '11px sans-serif';
        ctx.lineWidth = 1;

        ctx.textAlign = 'right';
        ctx.textBaseline = 'middle';
        const step = Math.max(1, Math.ceil(maxY / 5));
        for (let y = 0; y <= maxY; y += step) {
            ctx.beginPath();
            ctx.moveTo(PADDING.left, toY(y));
            ctx.lineTo(this.canvas.width - PADDING.right, toY(y));
            ctx.stroke();
            ctx.fillText(String(y), PADDING.left - 6, toY(y));
        }

        const periods = view.series.length ? view.series[0].points.map(p => p.x) : [];
        const every = Math.max(1, Math.ceil(periods.length / 10));
        const hourly = view.period_type === 'Hourly';
        ctx.textAlign = 'left';
        ctx.textBaseline = 'top';
        periods.forEach((x, i) => {
            if (i % every !== 0) return;
            const stamp = new Date(x).toISOString();
            const label = hourly ? stamp.slice(11, 16) : stamp.slice(0, 10);
            ctx.fillText(label, toX(x), bottom + 6);
        });
    };

    JobPlot.prototype.drawLegend = function(view) {
        if (!this.legend) return;
        this.legend.innerHTML = view.series.map(series =>
            `<li><span class="swatch" style="background:${series.color}"></span>${series.label}</li>`
        ).join('');
    };

    // The bar under a mouse event, as series and point indices, or null.
    JobPlot.prototype.hitTest = function(event) {
        const rect = this.canvas.getBoundingClientRect();
        const x = (event.clientX - rect.left) * this.canvas.width / rect.width;
        const y = (event.clientY - rect.top) * this.canvas.height / rect.height;

        const bar = this.bars.find(b =>
            x >= b.left && x <= b.right && y >= b.top && y <= b.bottom && b.bottom > b.top
        );
        return bar ? { series: bar.series, point: bar.point } : null;
    };

    global.JobPlot = JobPlot;
})(window);
"#;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        js,
    )
        .into_response()
}
