use crate::app::App;
use crate::components::{GamePhase, GameState, Tetromino};
use crate::config::CONFIG;
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render(f: &mut Frame, app: &mut App) {
    // Each board cell is 2 characters wide and 1 tall
    let cell_width = 2;
    let board_width = BOARD_WIDTH as u16 * cell_width + 2; // +2 for borders
    let board_height = BOARD_HEIGHT as u16 + 2; // +2 for borders
    let min_info_width = 20u16;
    let min_total_width = board_width + min_info_width;
    let min_total_height = board_height + 5; // Adding space for title and borders

    // Check if the terminal is too small to render the game properly
    if f.area().width < min_total_width || f.area().height < min_total_height {
        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Blockfall - Paused"),
        );

        let warning_area = centered_rect(50, 30, f.area());
        f.render_widget(warning_text, warning_area);
        return;
    }

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_width),
            Constraint::Min(min_info_width),
        ])
        .split(f.area());

    let game_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),            // Title
            Constraint::Length(board_height), // Game board
            Constraint::Fill(1),
        ])
        .split(main_layout[0]);

    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(5), // Score / level / lines
            Constraint::Length(7), // Next piece preview
            Constraint::Length(4), // Status
            Constraint::Min(5),    // Controls
        ])
        .split(main_layout[1]);

    // Render game title
    let title = Paragraph::new("BLOCKFALL")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, game_layout[0]);

    render_game_board(f, app, game_layout[1]);

    let info_title = Paragraph::new("INFO")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let game_state = app.world.resource::<GameState>().clone();

    let basic_stats = format!(
        "Score: {}\nLevel: {}\nLines: {}",
        game_state.score, game_state.level, game_state.lines_cleared,
    );
    let basic_info = Paragraph::new(basic_stats)
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: true });
    f.render_widget(basic_info, info_layout[1]);

    render_next_piece(f, &game_state, info_layout[2]);

    let status = match game_state.phase {
        GamePhase::NotStarted => Paragraph::new("Press Enter to start")
            .style(Style::default().fg(Color::LightGreen))
            .wrap(Wrap { trim: true }),
        GamePhase::Running => Paragraph::new("").wrap(Wrap { trim: true }),
        GamePhase::Paused => Paragraph::new("PAUSED\nPress P to resume")
            .style(Style::default().fg(Color::LightYellow))
            .wrap(Wrap { trim: true }),
        GamePhase::GameOver => Paragraph::new("GAME OVER!\nPress Enter to restart")
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true }),
    };
    f.render_widget(status, info_layout[3]);

    // Render controls with current key bindings
    let controls = Paragraph::new(
        "Controls:\n\
        ←/→: Move left/right\n\
        ↓: Soft drop\n\
        Enter: Hard drop\n\
        ↑/Space: Rotate\n\
        P: Pause\n\
        Q: Quit\n\
        ",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[4]);
}

fn render_game_board(f: &mut Frame, app: &mut App, area: Rect) {
    let cell_width = 2; // Each cell is 2 characters wide

    let inner_area = Block::default().borders(Borders::ALL).inner(area);
    f.render_widget(Block::default().borders(Borders::ALL), area);

    let game_over = app.world.resource::<GameState>().is_over();
    let blocks = app.get_render_blocks();

    for (position, kind) in blocks {
        let x = position.x as u16;
        let y = position.y as u16;

        if x < BOARD_WIDTH as u16 && y < BOARD_HEIGHT as u16 {
            let block_x = inner_area.left() + x * cell_width;
            let block_y = inner_area.top() + y;

            if block_x + 1 < inner_area.right() && block_y < inner_area.bottom() {
                let color = kind.color();

                // Each cell is two characters wide for better proportions
                for dx in 0..2 {
                    if let Some(cell) = f.buffer_mut().cell_mut((block_x + dx, block_y)) {
                        cell.set_symbol("█");
                        cell.set_fg(color);
                        cell.set_bg(Color::Black);
                    }
                }
            }
        }
    }

    // If game is over, overlay "GAME OVER" text
    if game_over {
        let game_over_text = Paragraph::new("GAME OVER")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

        let game_over_area = Rect {
            x: inner_area.x + (inner_area.width / 2).saturating_sub(5),
            y: inner_area.y + (inner_area.height / 2),
            width: 10,
            height: 1,
        };

        f.render_widget(game_over_text, game_over_area);
    }
}

pub(crate) fn render_next_piece(f: &mut Frame, game_state: &GameState, area: Rect) {
    let show_next = CONFIG
        .read()
        .map_or(true, |config| config.ui.show_next_piece);
    if !show_next {
        return;
    }

    let block = Block::default().borders(Borders::ALL).title("Next");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(kind) = game_state.next_tetromino else {
        return;
    };

    let piece = Tetromino::new(kind);
    let color = piece.color();
    for (x, y) in piece.cells(crate::components::Position { x: 0, y: 0 }) {
        let cell_x = inner.left() + (x as u16) * 2;
        let cell_y = inner.top() + y as u16;
        if cell_x + 1 < inner.right() && cell_y < inner.bottom() {
            for dx in 0..2 {
                if let Some(cell) = f.buffer_mut().cell_mut((cell_x + dx, cell_y)) {
                    cell.set_symbol("█");
                    cell.set_fg(color);
                }
            }
        }
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
