use iced::widget::{button, column, pick_list, row, scrollable, text, text_input, Column, Row};
use iced::{Alignment, Element, Length};

use crate::state::catalog::FileCatalog;
use crate::Message;

/// Page sizes offered in the navigation bar
const PAGE_SIZES: [usize; 4] = [10, 20, 50, 100];

/// Search box, the entries of the current page and the page navigation
pub fn view<'a>(catalog: &'a FileCatalog, selected: Option<&str>) -> Element<'a, Message> {
    let search = text_input("Filter textures...", catalog.query())
        .on_input(Message::FilterChanged)
        .padding(8);

    let entries = catalog.get_files().iter().fold(Column::new().spacing(2), |col, entry| {
        let is_selected = selected == Some(entry.path.as_str());
        let label = text(entry.display_path()).size(14);

        col.push(
            button(label)
                .width(Length::Fill)
                .style(if is_selected { button::primary } else { button::text })
                .on_press(Message::OpenPreview(entry.clone())),
        )
    });

    let summary = text(format!(
        "{} of {} textures match",
        catalog.filtered_count(),
        catalog.files().len()
    ))
    .size(12);

    column![
        search,
        summary,
        scrollable(entries).height(Length::Fill),
        navigation(catalog),
    ]
    .spacing(10)
    .width(Length::FillPortion(2))
    .into()
}

/// Previous / numbered / next page buttons
fn navigation(catalog: &FileCatalog) -> Element<'_, Message> {
    let pagination = catalog.pagination();

    let pages = pagination.window().fold(Row::new().spacing(4), |nav, page| {
        let current = page == pagination.current_page as i64;
        nav.push(
            button(text(page.to_string()).size(13))
                .style(if current { button::primary } else { button::secondary })
                .on_press_maybe((!current).then_some(Message::GotoPage(page, false))),
        )
    });

    row![
        button("‹")
            .on_press_maybe(pagination.has_previous().then_some(Message::GotoPage(-1, true))),
        pages,
        button("›").on_press_maybe(pagination.has_next().then_some(Message::GotoPage(1, true))),
        text(format!(
            "Page {} of {}",
            pagination.current_page,
            pagination.total_pages.max(1)
        ))
        .size(13),
        pick_list(PAGE_SIZES, Some(pagination.per_page), Message::PerPageSelected),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}
