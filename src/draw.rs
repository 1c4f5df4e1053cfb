// embedded-graphics adapter: draws a decoded image as Gray8.
// Sub-images are clipped to the image and drawn with their top-left at the
// target origin, matching ImageRaw.

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Size},
    image::ImageDrawable,
    pixelcolor::Gray8,
    primitives::{PointsIter, Rectangle},
};

use crate::image::ImageHandle;

/// Greyscale view of an [`ImageHandle`] for `embedded-graphics` targets.
#[derive(Clone, Copy)]
pub struct Gray8Image<'a> {
    handle: &'a ImageHandle,
}

impl ImageHandle {
    pub fn as_gray8(&self) -> Gray8Image<'_> {
        Gray8Image { handle: self }
    }
}

impl OriginDimensions for Gray8Image<'_> {
    fn size(&self) -> Size {
        if self.handle.is_decoded() {
            Size::new(self.handle.width(), self.handle.height())
        } else {
            Size::zero()
        }
    }
}

impl ImageDrawable for Gray8Image<'_> {
    type Color = Gray8;

    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        self.draw_sub_image(target, &self.bounding_box())
    }

    fn draw_sub_image<D>(&self, target: &mut D, area: &Rectangle) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        let area = area.intersection(&self.bounding_box());
        let origin = area.top_left;
        let handle = self.handle;

        target.draw_iter(area.points().filter_map(move |p| {
            let grey = handle.luma(p.x as u32, p.y as u32)?;
            Some(Pixel(p - origin, Gray8::new(grey)))
        }))
    }
}
