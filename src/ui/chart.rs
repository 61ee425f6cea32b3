use std::io::{self, Write};

use crossterm::style::{self as term, Stylize};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Rectangle},
        Block, Borders, Paragraph, Widget,
    },
};

use crate::error::Result;
use crate::fetch::Candle;

const MIN_WIDTH: u16 = 24;
const MIN_HEIGHT: u16 = 8;
const DEFAULT_WIDTH: u16 = 100;
const CHART_HEIGHT: u16 = 24;
const BODY_EPSILON: f64 = 1e-4;

/// Render candles to plain text lines of exactly `width` columns.
pub fn render_candles(title: &str, candles: &[Candle], width: u16, height: u16) -> Vec<String> {
    let buffer = draw(title, candles, width, height);
    buffer_rows(&buffer)
        .into_iter()
        .map(|row| row.into_iter().map(|(symbol, _)| symbol).collect())
        .collect()
}

/// Draw a candlestick chart sized to the current terminal and write it to stdout.
pub fn print_chart(title: &str, candles: &[Candle]) -> Result<()> {
    let width = crossterm::terminal::size()
        .map(|(cols, _)| cols)
        .unwrap_or(DEFAULT_WIDTH);
    let buffer = draw(title, candles, width, CHART_HEIGHT);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for row in buffer_rows(&buffer) {
        for (symbol, color) in row {
            match terminal_color(color) {
                Some(color) => write!(out, "{}", symbol.with(color))?,
                None => write!(out, "{}", symbol)?,
            }
        }
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn draw(title: &str, candles: &[Candle], width: u16, height: u16) -> Buffer {
    let area = Rect::new(0, 0, width.max(MIN_WIDTH), height.max(MIN_HEIGHT));
    let mut buffer = Buffer::empty(area);

    if candles.is_empty() {
        Paragraph::new("No bars to plot.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .render(area, &mut buffer);
        return buffer;
    }

    // Borders take one column on each side.
    let series = compress_to_width(candles, area.width.saturating_sub(2));

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for candle in &series {
        y_min = y_min.min(candle.low);
        y_max = y_max.max(candle.high);
    }
    let padding = ((y_max - y_min) * 0.02).max(0.01);
    let y_bounds = [y_min - padding, y_max + padding];
    let x_bounds = [0.0, series.len() as f64];
    let half_body = 0.3;

    let label = format!("{title} • high {y_max:.2} • low {y_min:.2}");
    Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(label))
        .marker(Marker::HalfBlock)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for (idx, candle) in series.iter().enumerate() {
                let x = idx as f64 + 0.5;
                let color = if candle.is_bullish() {
                    Color::Green
                } else {
                    Color::Red
                };

                ctx.draw(&CanvasLine {
                    x1: x,
                    y1: candle.low,
                    x2: x,
                    y2: candle.high,
                    color,
                });

                let body_top = candle.open.max(candle.close);
                let body_bottom = candle.open.min(candle.close);
                if (body_top - body_bottom).abs() < BODY_EPSILON {
                    ctx.draw(&CanvasLine {
                        x1: x - half_body,
                        y1: body_top,
                        x2: x + half_body,
                        y2: body_top,
                        color,
                    });
                } else {
                    ctx.draw(&Rectangle {
                        x: x - half_body,
                        y: body_bottom,
                        width: half_body * 2.0,
                        height: body_top - body_bottom,
                        color,
                    });
                }
            }
        })
        .render(area, &mut buffer);

    buffer
}

fn buffer_rows(buffer: &Buffer) -> Vec<Vec<(String, Color)>> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| {
                    let cell = buffer.get(x, y);
                    (cell.symbol().to_string(), cell.fg)
                })
                .collect()
        })
        .collect()
}

fn terminal_color(color: Color) -> Option<term::Color> {
    match color {
        Color::Green => Some(term::Color::Green),
        Color::Red => Some(term::Color::Red),
        Color::DarkGray => Some(term::Color::DarkGrey),
        _ => None,
    }
}

/// Merge neighbouring candles so the series fits within `width` columns.
fn compress_to_width(candles: &[Candle], width: u16) -> Vec<Candle> {
    let max_points = usize::from(width.max(1));
    if candles.len() <= max_points {
        return candles.to_vec();
    }

    let stride = candles.len().div_ceil(max_points);
    candles
        .chunks(stride)
        .filter_map(|chunk| {
            let first = chunk.first()?;
            let last = chunk.last()?;
            Some(Candle {
                timestamp: last.timestamp,
                open: first.open,
                close: last.close,
                high: chunk.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max),
                low: chunk.iter().map(|c| c.low).fold(f64::INFINITY, f64::min),
                volume: chunk.iter().map(|c| c.volume).sum(),
            })
        })
        .collect()
}
