use iced::widget::{button, canvas, column, container, image, row, slider, stack, text, text_input, Column};
use iced::{Alignment, ContentFit, Element, Length};

use super::clip_overlay::ClipOverlay;
use super::preview::Preview;
use crate::state::clip::Edge;
use crate::Message;

/// Longest side of the texture on screen
const DISPLAY_SIZE: f32 = 384.0;
/// Small textures are magnified at most this much
const MAX_MAGNIFICATION: f32 = 8.0;

/// Texture with its clip overlay, the edge editors and the derived strings
pub fn view(preview: &Preview) -> Element<'_, Message> {
    let size = preview.size();
    let longest = size.width.max(size.height).max(1) as f32;
    let scale = (DISPLAY_SIZE / longest).min(MAX_MAGNIFICATION);
    let (w, h) = (size.width as f32 * scale, size.height as f32 * scale);

    let picture = stack![
        image(preview.handle.clone())
            .width(Length::Fixed(w))
            .height(Length::Fixed(h))
            .content_fit(ContentFit::Fill),
        canvas(ClipOverlay {
            coord: preview.clip.coord,
        })
        .width(Length::Fixed(w))
        .height(Length::Fixed(h)),
    ];

    let editors = Edge::ALL.into_iter().fold(Column::new().spacing(6), |col, edge| {
        col.push(edge_editor(preview, edge))
    });

    let mut outputs = column![
        text(format!("{}x{} px", size.width, size.height)).size(13),
        text(preview.clip.to_clip_path()).size(14),
        text(preview.clip.to_tex_coords()).size(14),
    ]
    .spacing(4);

    if let Some(error) = &preview.error {
        outputs = outputs.push(text(error).size(13).style(text::danger));
    }

    let actions = row![
        button("Download").on_press(Message::DownloadImage),
        button("Close").style(button::secondary).on_press(Message::ClosePreview),
    ]
    .spacing(10);

    column![
        text(preview.entry.display_path()).size(18),
        container(picture).padding(4).style(container::bordered_box),
        editors,
        outputs,
        actions,
    ]
    .spacing(12)
    .width(Length::FillPortion(3))
    .into()
}

/// Slider for the coordinate and text field for the pixel value of one edge
fn edge_editor(preview: &Preview, edge: Edge) -> Element<'_, Message> {
    let coord = preview.clip.coord.get(edge);

    row![
        text(edge.label()).width(Length::Fixed(60.0)),
        slider(0.0..=1.0, coord, move |v| Message::CoordChanged(edge, v))
            .step(0.0001)
            .width(Length::Fill),
        text(format!("{coord:.4}")).width(Length::Fixed(60.0)),
        text_input("px", &preview.pixel_text[edge.index()])
            .on_input(move |s| Message::PixelInput(edge, s))
            .width(Length::Fixed(80.0)),
    ]
    .spacing(8)
    .align_y(Alignment::Center)
    .into()
}
