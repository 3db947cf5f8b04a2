//! Client script driving the gallery page.
//!
//! The page only carries data; navigation lives here.

/// Bump the version whenever the script changes so browsers fetch the new file.
pub const SCRIPT_PATH: &str = "/assets/gallery-v1.js";

pub const GALLERY_SCRIPT: &str = r##"(function () {
    "use strict";

    var content = document.getElementById("content");
    var imagesUrl = content.dataset.imagesUrl;
    var directory = content.dataset.directory;
    var catalog = JSON.parse(document.getElementById("catalog").textContent);
    var groups = Object.keys(catalog);

    var link = document.querySelector("a.current");
    var image = document.querySelector("img.current");
    var status = document.getElementById("status");
    var select = document.getElementById("group");
    var offsetInput = document.getElementById("offset");

    var images = [];
    var currentIndex = 0;
    var preloaded = {};

    function preload(index) {
        if (index < 0 || index >= images.length || preloaded[images[index]]) {
            return;
        }
        var img = new Image();
        img.src = imagesUrl + encodeURIComponent(images[index]);
        preloaded[images[index]] = img;
    }

    function changeImage(index) {
        if (images.length === 0) {
            return;
        }
        index = Math.max(0, Math.min(images.length - 1, index));
        var url = imagesUrl + encodeURIComponent(images[index]);
        link.href = url;
        image.alt = images[index];
        image.src = url;
        status.textContent = "Now serving image " + (index + 1) + " of " + images.length +
            " image(s) from '" + directory + "'.";
        currentIndex = index;
        preload(index - 1);
        preload(index + 1);
    }

    function selectGroup(name) {
        images = catalog[name] || [];
        preloaded = {};
        if (images.length > 0) {
            image.hidden = false;
            // Start on the last image.
            changeImage(images.length - 1);
        } else {
            image.hidden = true;
            link.removeAttribute("href");
            status.textContent = "No images to serve from '" + directory + "'.";
        }
    }

    function offset() {
        var value = parseInt(offsetInput.value, 10);
        return isNaN(value) || value < 1 ? 1 : value;
    }

    function bind(id, handler) {
        document.getElementById(id).addEventListener("click", function (e) {
            e.preventDefault();
            handler();
        });
    }

    bind("first", function () { changeImage(0); });
    bind("previous", function () { changeImage(currentIndex - 1); });
    bind("next", function () { changeImage(currentIndex + 1); });
    bind("last", function () { changeImage(images.length - 1); });
    bind("back", function () { changeImage(currentIndex - offset()); });
    bind("forward", function () { changeImage(currentIndex + offset()); });

    document.addEventListener("keydown", function (e) {
        if (e.target === offsetInput) {
            return;
        }
        switch (e.key) {
            case "ArrowLeft": changeImage(currentIndex - 1); break;
            case "ArrowRight": changeImage(currentIndex + 1); break;
            case "Home": changeImage(0); break;
            case "End": changeImage(images.length - 1); break;
            default: return;
        }
        e.preventDefault();
    });

    if (groups.length > 1) {
        groups.forEach(function (name) {
            var option = document.createElement("option");
            option.value = name;
            option.textContent = name + " (" + catalog[name].length + ")";
            select.appendChild(option);
        });
        select.hidden = false;
        select.addEventListener("change", function () { selectGroup(select.value); });
    }

    selectGroup(groups.length > 0 ? groups[0] : null);
})();
"##;
